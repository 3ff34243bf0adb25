//! Constraint monitoring: goal checks at plan end and ordered temporal
//! progress during the plan.
//!
//! Target statuses resolve dotted attribute paths against the named entity;
//! positional paths may use the aligned-position predicate instead of plain
//! equality. Like the checker, the monitor never mutates the world.

use serde_json::{json, Value};

use crate::domain::models::constraint::{
    PosCheck, StatusEntry, TargetKind, TargetStatus, TemporalConstraint,
};
use crate::domain::models::entities::{Param, Position};
use crate::domain::models::verdict::FailureKind;
use crate::services::checker::aligned_position;
use crate::services::world::World;

/// Whether every status in a constraint group currently holds.
pub fn constraint_satisfied(world: &World, group: &[StatusEntry]) -> bool {
    group.iter().all(|entry| {
        entry
            .as_status()
            .is_some_and(|status| status_satisfied(world, status))
    })
}

/// Evaluate one target status against the world.
///
/// Each `(path, expected)` pair is resolved and XOR-ed with `is_satisfied`;
/// the first mismatch short-circuits. A missing entity or unknown attribute
/// path counts as a failed condition.
fn status_satisfied(world: &World, status: &TargetStatus) -> bool {
    let target = match status.kind {
        TargetKind::Asset => Param::Asset(status.name.clone()),
        TargetKind::Agent => Param::Agent(status.name.clone()),
    };

    for (path, expected) in &status.status {
        let holds = if status.check_pos_type == PosCheck::Aligned && path.contains("pos.name") {
            expected
                .as_str()
                .is_some_and(|name| aligned_position(world, &target, &Position::new(name)))
        } else {
            attr_value(world, &target, path).is_some_and(|actual| actual == *expected)
        };
        if holds != status.is_satisfied {
            return false;
        }
    }
    true
}

/// Resolve a dotted attribute path on a named entity to a comparable value.
fn attr_value(world: &World, target: &Param, path: &str) -> Option<Value> {
    match target {
        Param::Asset(name) => {
            let asset = world.asset(name)?;
            match path {
                "name" => Some(json!(asset.name)),
                "pos.name" => Some(json!(world.asset_position(asset).name)),
                "pos.isolated" => Some(json!(world.asset_position(asset).isolated)),
                "is_activated" => Some(json!(asset.is_activated)),
                "is_container" => Some(json!(asset.is_container)),
                "is_grasped_by" => Some(json!(asset.is_grasped_by)),
                "container_position.name" => {
                    asset.container_position.as_ref().map(|p| json!(p.name))
                }
                "container_position.isolated" => {
                    asset.container_position.as_ref().map(|p| json!(p.isolated))
                }
                _ => None,
            }
        }
        Param::Agent(name) => {
            let agent = world.agent(name)?;
            match path {
                "name" => Some(json!(agent.name)),
                "type" => Some(json!(agent.kind.as_str())),
                "pos.name" => Some(json!(agent.pos.name)),
                "pos.isolated" => Some(json!(agent.pos.isolated)),
                "end_effector_num" => Some(json!(agent.end_effector_num)),
                "reached_objects" => Some(json!(agent.reached_objects)),
                "carried_objects" => Some(json!(agent.carried_objects)),
                _ => None,
            }
        }
        Param::Position(_) => None,
    }
}

/// Tracks ordered temporal-constraint progress across steps.
///
/// A constraint completes once all of its groups hold at one step, having
/// never regressed; completion is sticky. A later group holding while an
/// earlier group does not is a regression and fails the plan.
#[derive(Debug, Clone)]
pub struct TemporalTracker {
    satisfied: Vec<bool>,
}

impl TemporalTracker {
    pub fn new(constraint_count: usize) -> Self {
        Self {
            satisfied: vec![false; constraint_count],
        }
    }

    /// Observe the world after one step.
    pub fn observe(
        &mut self,
        world: &World,
        constraints: &[TemporalConstraint],
    ) -> Result<(), FailureKind> {
        for (done, constraint) in self.satisfied.iter_mut().zip(constraints) {
            if *done {
                continue;
            }
            let mut prefix_holds = true;
            for group in constraint {
                if constraint_satisfied(world, group) {
                    if !prefix_holds {
                        return Err(FailureKind::FailedTemporalConstraint);
                    }
                } else {
                    prefix_holds = false;
                }
            }
            if prefix_holds {
                *done = true;
            }
        }
        Ok(())
    }

    pub fn all_satisfied(&self) -> bool {
        self.satisfied.iter().all(|done| *done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::command::ResolvedCommand;
    use crate::domain::models::entities::RobotKind;
    use crate::domain::models::scene::SceneSpec;

    fn world() -> World {
        let mut spec = SceneSpec::default();
        spec.add_agent("R1", RobotKind::UnitreeH1)
            .add_asset("bread", "kitchen")
            .add_container("toaster", "kitchen", false)
            .add_container("cabinet", "room_cabinet", true);
        World::build(&spec).unwrap()
    }

    fn status(kind: TargetKind, name: &str, satisfied: bool, json: &str) -> StatusEntry {
        StatusEntry::Status(TargetStatus {
            kind,
            name: name.to_string(),
            is_satisfied: satisfied,
            status: serde_json::from_str(json).unwrap(),
            check_pos_type: PosCheck::Static,
        })
    }

    #[test]
    fn test_static_attribute_check() {
        let w = world();
        let holds = status(TargetKind::Asset, "bread", true, r#"{"pos.name": "kitchen"}"#);
        assert!(constraint_satisfied(&w, &[holds]));

        let fails = status(TargetKind::Asset, "bread", true, r#"{"pos.name": "toaster"}"#);
        assert!(!constraint_satisfied(&w, &[fails]));
    }

    #[test]
    fn test_negated_status() {
        let w = world();
        // is_satisfied = false: holds exactly when the condition fails.
        let entry = status(TargetKind::Asset, "bread", false, r#"{"pos.name": "toaster"}"#);
        assert!(constraint_satisfied(&w, &[entry]));

        let entry = status(TargetKind::Asset, "bread", false, r#"{"pos.name": "kitchen"}"#);
        assert!(!constraint_satisfied(&w, &[entry]));
    }

    #[test]
    fn test_container_isolation_path() {
        let w = world();
        let entry = status(
            TargetKind::Asset,
            "cabinet",
            true,
            r#"{"container_position.isolated": true}"#,
        );
        assert!(constraint_satisfied(&w, &[entry]));
    }

    #[test]
    fn test_grasped_by_empty_list() {
        let w = world();
        let entry = status(TargetKind::Asset, "bread", true, r#"{"is_grasped_by": []}"#);
        assert!(constraint_satisfied(&w, &[entry]));
    }

    #[test]
    fn test_missing_entity_fails_condition() {
        let w = world();
        let entry = status(TargetKind::Asset, "ghost", true, r#"{"pos.name": "kitchen"}"#);
        assert!(!constraint_satisfied(&w, &[entry]));
    }

    #[test]
    fn test_aligned_position_mode() {
        let mut w = world();
        // Put the bread into the toaster: its static pos.name is "toaster",
        // and aligned lookup resolves deeper targets too.
        w.apply(&ResolvedCommand {
            op: "move".to_string(),
            params: vec![
                Param::Agent("R1".to_string()),
                Param::Asset("bread".to_string()),
            ],
        });
        w.apply(&ResolvedCommand {
            op: "reach".to_string(),
            params: vec![
                Param::Agent("R1".to_string()),
                Param::Asset("bread".to_string()),
            ],
        });
        w.apply(&ResolvedCommand {
            op: "grasp".to_string(),
            params: vec![
                Param::Agent("R1".to_string()),
                Param::Asset("bread".to_string()),
            ],
        });
        w.apply(&ResolvedCommand {
            op: "move".to_string(),
            params: vec![
                Param::Agent("R1".to_string()),
                Param::Asset("toaster".to_string()),
            ],
        });
        w.apply(&ResolvedCommand {
            op: "place".to_string(),
            params: vec![
                Param::Agent("R1".to_string()),
                Param::Asset("toaster".to_string()),
            ],
        });

        let aligned = StatusEntry::Status(TargetStatus {
            kind: TargetKind::Asset,
            name: "bread".to_string(),
            is_satisfied: true,
            status: serde_json::from_str(r#"{"pos.name": "kitchen"}"#).unwrap(),
            check_pos_type: PosCheck::Aligned,
        });
        // Statically the bread is at "toaster", but the toaster sits in the
        // kitchen, so the aligned check resolves.
        assert!(constraint_satisfied(&w, &[aligned]));

        let static_check = status(TargetKind::Asset, "bread", true, r#"{"pos.name": "kitchen"}"#);
        assert!(!constraint_satisfied(&w, &[static_check]));
    }

    #[test]
    fn test_temporal_progress_and_regression() {
        let w = world();
        let in_toaster = vec![status(
            TargetKind::Asset,
            "bread",
            true,
            r#"{"pos.name": "toaster"}"#,
        )];
        let activated = vec![status(
            TargetKind::Asset,
            "toaster",
            true,
            r#"{"is_activated": true}"#,
        )];
        let constraints = vec![vec![in_toaster, activated]];

        let mut tracker = TemporalTracker::new(1);
        // Neither group holds yet: no progress, no failure.
        assert!(tracker.observe(&w, &constraints).is_ok());
        assert!(!tracker.all_satisfied());

        // Activate the toaster while the bread is elsewhere: the second
        // group fires before the first, which is a regression.
        let mut w2 = w.clone();
        w2.apply(&ResolvedCommand {
            op: "interact".to_string(),
            params: vec![
                Param::Agent("R1".to_string()),
                Param::Asset("toaster".to_string()),
            ],
        });
        assert_eq!(
            tracker.observe(&w2, &constraints),
            Err(FailureKind::FailedTemporalConstraint)
        );
    }

    #[test]
    fn test_temporal_completion_is_sticky() {
        let mut w = world();
        let in_kitchen = vec![status(
            TargetKind::Asset,
            "bread",
            true,
            r#"{"pos.name": "kitchen"}"#,
        )];
        let constraints = vec![vec![in_kitchen]];

        let mut tracker = TemporalTracker::new(1);
        assert!(tracker.observe(&w, &constraints).is_ok());
        assert!(tracker.all_satisfied());

        // The bread moving away later does not unsatisfy the constraint.
        w.apply(&ResolvedCommand {
            op: "move".to_string(),
            params: vec![
                Param::Agent("R1".to_string()),
                Param::Asset("bread".to_string()),
            ],
        });
        w.apply(&ResolvedCommand {
            op: "reach".to_string(),
            params: vec![
                Param::Agent("R1".to_string()),
                Param::Asset("bread".to_string()),
            ],
        });
        w.apply(&ResolvedCommand {
            op: "grasp".to_string(),
            params: vec![
                Param::Agent("R1".to_string()),
                Param::Asset("bread".to_string()),
            ],
        });
        assert!(tracker.observe(&w, &constraints).is_ok());
        assert!(tracker.all_satisfied());
    }
}
