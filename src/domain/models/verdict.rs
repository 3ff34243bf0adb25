//! Evaluation verdicts.
//!
//! Failures are categorical, not exceptional: the evaluator stops at the
//! first failing check and reports its kind. Each kind carries a fixed
//! machine code and a fixed human description intended for feedback prompts.

use serde::{Deserialize, Serialize};

/// Why a plan was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    InvalidCommand,
    NotFoundEntity,
    ActionNotFeasible,
    FailedGoalConstraint,
    ActionNotCompatible,
    FailedTemporalConstraint,
}

impl FailureKind {
    /// Stable machine code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCommand => "INVALID_COMMAND",
            Self::NotFoundEntity => "NOT_FOUND_ENTITY",
            Self::ActionNotFeasible => "ACTION_NOT_FEASIBLE",
            Self::FailedGoalConstraint => "FAILED_GOAL_CONSTRAINT",
            Self::ActionNotCompatible => "ACTION_NOT_COMPATIBLE",
            Self::FailedTemporalConstraint => "FAILED_TEMPORAL_CONSTRAINT",
        }
    }

    /// Fixed human description, suitable for plan-author feedback.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidCommand => "invalid format of the command.",
            Self::NotFoundEntity => "entity not found in the environment.",
            Self::ActionNotFeasible => "action not feasible.",
            Self::FailedGoalConstraint => "failed goal constraint.",
            Self::ActionNotCompatible => "action not compatible in one step.",
            Self::FailedTemporalConstraint => "failed temporal constraint.",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The evaluator's result for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl Verdict {
    pub fn success() -> Self {
        Self {
            success: true,
            failure: None,
        }
    }

    pub fn failure(kind: FailureKind) -> Self {
        Self {
            success: false,
            failure: Some(kind),
        }
    }

    /// The failure description, or an empty string on success.
    pub fn description(&self) -> &'static str {
        self.failure.map_or("", |kind| kind.description())
    }
}
