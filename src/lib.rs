//! Arbiter - Multi-Robot Plan Evaluator
//!
//! Evaluates multi-robot collaboration plans against declarative task
//! specifications:
//! - Simulated world model (typed entities, containers, end-effector budgets)
//! - Per-action feasibility with aligned-position transitive lookup
//! - Per-step concurrency compatibility rules
//! - Deterministic batched state transitions
//! - Goal and ordered temporal-constraint monitoring

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export key types for convenience
pub use domain::models::{FailureKind, Plan, SceneSpec, Verdict};
pub use services::Evaluator;
