//! Domain models for the plan evaluator.

pub mod action;
pub mod command;
pub mod constraint;
pub mod entities;
pub mod plan;
pub mod scene;
pub mod verdict;

pub use action::{ActionSpec, Op, CONTAINER_ASSET_TYPES, ISOLATED_CONTAINER_TYPES};
pub use command::{is_valid_command, parse_command, ParsedCommand, ResolvedCommand};
pub use constraint::{
    ConstraintGroup, PosCheck, StatusEntry, TargetKind, TargetStatus, TemporalConstraint,
};
pub use entities::{Agent, Asset, Param, ParamKind, Placement, Position, RobotKind};
pub use plan::{Plan, StepInput};
pub use scene::{AgentSpec, AssetSpec, ContainerSpec, PositionSpec, SceneSpec};
pub use verdict::{FailureKind, Verdict};
