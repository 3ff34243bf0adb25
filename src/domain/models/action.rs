//! Operation registry: the nine joint-action operations, their positional
//! parameter signatures and name scopes, and the container asset-type tables.
//!
//! All tables are compile-time constants; the checker treats them as the
//! single source of truth for action typing.

use serde::{Deserialize, Serialize};

use super::entities::ParamKind;

/// The fixed set of operations a command may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Move,
    Reach,
    Grasp,
    Place,
    Open,
    Close,
    Handover,
    Interact,
    Push,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Reach => "reach",
            Self::Grasp => "grasp",
            Self::Place => "place",
            Self::Open => "open",
            Self::Close => "close",
            Self::Handover => "handover",
            Self::Interact => "interact",
            Self::Push => "push",
        }
    }

    /// Parse a lowercased operation name. Unknown names are not an error at
    /// this layer: the checker reports them as infeasible.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "move" => Some(Self::Move),
            "reach" => Some(Self::Reach),
            "grasp" => Some(Self::Grasp),
            "place" => Some(Self::Place),
            "open" => Some(Self::Open),
            "close" => Some(Self::Close),
            "handover" => Some(Self::Handover),
            "interact" => Some(Self::Interact),
            "push" => Some(Self::Push),
            _ => None,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positional signature of an operation: for each parameter after the acting
/// agent, the entity kinds allowed there and an optional name allow-list.
#[derive(Debug, Clone, Copy)]
pub struct ActionSpec {
    pub op: Op,
    /// Allowed entity kinds per parameter slot.
    pub param_types: &'static [&'static [ParamKind]],
    /// Allowed entity names per parameter slot; an empty slice means the
    /// slot is unrestricted.
    pub param_scopes: &'static [&'static [&'static str]],
}

/// Names `open`/`close` may operate on.
pub const OPENABLE_NAMES: &[&str] = &["cabinet", "drawer", "kitchen cabinet", "kitchen drawer"];

/// Names `push` may operate on.
pub const PUSHABLE_NAMES: &[&str] = &["box", "cardboardbox"];

/// Asset types that serve as containers for other assets.
pub const CONTAINER_ASSET_TYPES: &[&str] = &[
    "plate",
    "cabinet",
    "drawer",
    "bowl",
    "sink",
    "toaster",
    "tray",
    "cardboardbox",
];

/// Container types whose interior starts closed.
pub const ISOLATED_CONTAINER_TYPES: &[&str] = &["cabinet"];

const ANY_ENTITY: &[ParamKind] = &[ParamKind::Agent, ParamKind::Asset, ParamKind::Position];
const AGENT_OR_ASSET: &[ParamKind] = &[ParamKind::Agent, ParamKind::Asset];
const ASSET_ONLY: &[ParamKind] = &[ParamKind::Asset];
const ASSET_OR_POSITION: &[ParamKind] = &[ParamKind::Asset, ParamKind::Position];
const AGENT_ONLY: &[ParamKind] = &[ParamKind::Agent];

const UNSCOPED: &[&str] = &[];

const MOVE_SPEC: ActionSpec = ActionSpec {
    op: Op::Move,
    param_types: &[ANY_ENTITY],
    param_scopes: &[UNSCOPED],
};
const REACH_SPEC: ActionSpec = ActionSpec {
    op: Op::Reach,
    param_types: &[AGENT_OR_ASSET],
    param_scopes: &[UNSCOPED],
};
const GRASP_SPEC: ActionSpec = ActionSpec {
    op: Op::Grasp,
    param_types: &[ASSET_ONLY],
    param_scopes: &[UNSCOPED],
};
const PLACE_SPEC: ActionSpec = ActionSpec {
    op: Op::Place,
    param_types: &[ASSET_OR_POSITION],
    param_scopes: &[UNSCOPED],
};
const OPEN_SPEC: ActionSpec = ActionSpec {
    op: Op::Open,
    param_types: &[ASSET_ONLY],
    param_scopes: &[OPENABLE_NAMES],
};
const CLOSE_SPEC: ActionSpec = ActionSpec {
    op: Op::Close,
    param_types: &[ASSET_ONLY],
    param_scopes: &[OPENABLE_NAMES],
};
const HANDOVER_SPEC: ActionSpec = ActionSpec {
    op: Op::Handover,
    param_types: &[ASSET_ONLY, AGENT_ONLY],
    param_scopes: &[UNSCOPED, UNSCOPED],
};
const INTERACT_SPEC: ActionSpec = ActionSpec {
    op: Op::Interact,
    param_types: &[ASSET_ONLY],
    param_scopes: &[UNSCOPED],
};
const PUSH_SPEC: ActionSpec = ActionSpec {
    op: Op::Push,
    param_types: &[ASSET_ONLY, ANY_ENTITY],
    param_scopes: &[PUSHABLE_NAMES, UNSCOPED],
};

impl ActionSpec {
    /// Static signature for an operation.
    pub fn of(op: Op) -> &'static ActionSpec {
        match op {
            Op::Move => &MOVE_SPEC,
            Op::Reach => &REACH_SPEC,
            Op::Grasp => &GRASP_SPEC,
            Op::Place => &PLACE_SPEC,
            Op::Open => &OPEN_SPEC,
            Op::Close => &CLOSE_SPEC,
            Op::Handover => &HANDOVER_SPEC,
            Op::Interact => &INTERACT_SPEC,
            Op::Push => &PUSH_SPEC,
        }
    }
}
