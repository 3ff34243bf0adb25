//! Declarative goal and temporal constraint model.
//!
//! A [`TargetStatus`] is a predicate over one named entity's attribute paths.
//! A constraint is a list of target statuses (all must hold); a temporal
//! constraint is an ordered list of constraints that must become true in
//! order over the plan timeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which entity map a target status is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Asset,
    Agent,
}

/// How positional attribute paths are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosCheck {
    /// Plain equality on the resolved attribute value.
    #[default]
    Static,
    /// Transitive aligned-position lookup for `pos.name` paths.
    Aligned,
}

/// A predicate over a named entity.
///
/// Each `(attribute path, expected value)` pair must match; the result is
/// XOR-ed with `is_satisfied`, so a status with `is_satisfied = false` holds
/// exactly when its condition fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetStatus {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub name: String,
    pub is_satisfied: bool,
    pub status: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub check_pos_type: PosCheck,
}

/// A status entry as it appears on the wire: either a bare status or a
/// status wrapped in a single-element list (both forms occur in ground-truth
/// records).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusEntry {
    Status(TargetStatus),
    Wrapped(Vec<TargetStatus>),
}

impl StatusEntry {
    /// The underlying status; `None` for a wrapped list that is not exactly
    /// one element long.
    pub fn as_status(&self) -> Option<&TargetStatus> {
        match self {
            Self::Status(status) => Some(status),
            Self::Wrapped(statuses) if statuses.len() == 1 => statuses.first(),
            Self::Wrapped(_) => None,
        }
    }
}

/// All statuses in a group must hold for the group to be satisfied.
pub type ConstraintGroup = Vec<StatusEntry>;

/// Ordered groups that must become satisfied in sequence.
pub type TemporalConstraint = Vec<ConstraintGroup>;
