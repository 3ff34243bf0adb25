//! The evaluator driver: a state machine from parsed plan to verdict.
//!
//! Steps run in order; within a step every command is resolved and checked
//! for feasibility, the whole step is checked for compatibility, and only
//! then is the step applied with snapshot semantics. The driver returns at
//! the first failing check with its kind.

use tracing::debug;

use crate::domain::error::SceneError;
use crate::domain::models::command::{
    is_valid_command, parse_command, ParsedCommand, ResolvedCommand,
};
use crate::domain::models::entities::{Param, Position};
use crate::domain::models::plan::Plan;
use crate::domain::models::scene::SceneSpec;
use crate::domain::models::verdict::{FailureKind, Verdict};
use crate::services::checker;
use crate::services::monitor::{self, TemporalTracker};
use crate::services::world::World;

/// Judges plans against one scene description and its constraint sets.
///
/// Each call to [`evaluate`](Evaluator::evaluate) builds a fresh world, so an
/// evaluator can judge any number of plans and is safe to share across
/// threads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    scene: SceneSpec,
}

impl Evaluator {
    pub fn new(scene: SceneSpec) -> Self {
        Self { scene }
    }

    pub fn scene(&self) -> &SceneSpec {
        &self.scene
    }

    /// Simulate the plan step by step and return the verdict.
    ///
    /// An `Err` means the scene description itself is unusable; every plan
    /// defect maps to an `Ok` verdict with a failure kind.
    pub fn evaluate(&self, plan: &Plan) -> Result<Verdict, SceneError> {
        let mut world = World::build(&self.scene)?;

        // Every command of every step is parsed before anything simulates,
        // so a syntax error in a late step wins over early infeasibility.
        let mut steps: Vec<Vec<ParsedCommand>> = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            let mut commands = Vec::with_capacity(step.len());
            for (robot, text) in step {
                if !is_valid_command(text) {
                    debug!(robot = %robot, command = %text, "rejected command syntax");
                    return Ok(Verdict::failure(FailureKind::InvalidCommand));
                }
                commands.push(parse_command(robot, text));
            }
            steps.push(commands);
        }

        let temporal = &self.scene.temporal_constraints;
        let mut tracker = TemporalTracker::new(temporal.len());

        for commands in &steps {
            let mut resolved_step = Vec::with_capacity(commands.len());
            for parsed in commands {
                let mut params = Vec::with_capacity(parsed.params.len());
                for name in &parsed.params {
                    match resolve_param(&world, &parsed.op, name) {
                        Some(param) => params.push(param),
                        None => {
                            debug!(entity = %name, op = %parsed.op, "entity not found");
                            return Ok(Verdict::failure(FailureKind::NotFoundEntity));
                        }
                    }
                }
                if !checker::action_feasible(&world, &parsed.op, &params) {
                    debug!(op = %parsed.op, "action not feasible");
                    return Ok(Verdict::failure(FailureKind::ActionNotFeasible));
                }
                resolved_step.push(ResolvedCommand {
                    op: parsed.op.clone(),
                    params,
                });
            }

            if !checker::step_compatible(&world, &resolved_step) {
                debug!("step commands not compatible");
                return Ok(Verdict::failure(FailureKind::ActionNotCompatible));
            }

            world.apply_step(&resolved_step);

            if let Err(kind) = tracker.observe(&world, temporal) {
                debug!("temporal constraint regressed");
                return Ok(Verdict::failure(kind));
            }
        }

        if !tracker.all_satisfied() {
            return Ok(Verdict::failure(FailureKind::FailedTemporalConstraint));
        }
        for goal in &self.scene.goal_constraints {
            if !monitor::constraint_satisfied(&world, goal) {
                return Ok(Verdict::failure(FailureKind::FailedGoalConstraint));
            }
        }
        Ok(Verdict::success())
    }
}

/// Resolve a parameter name: agents shadow assets; unknown names become
/// anonymous positions for `move`/`place` targets and are a miss otherwise.
fn resolve_param(world: &World, op: &str, name: &str) -> Option<Param> {
    if world.has_agent(name) {
        return Some(Param::Agent(name.to_string()));
    }
    if world.has_asset(name) {
        return Some(Param::Asset(name.to_string()));
    }
    if op == "move" || op == "place" {
        return Some(Param::Position(Position::new(name)));
    }
    None
}
