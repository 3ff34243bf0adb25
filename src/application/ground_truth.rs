//! Ground-truth normalization: from raw task records to a buildable scene.
//!
//! Records arrive with null placeholders at every nesting level (unused
//! robot slots, absent asset instances, blank status attributes); these are
//! stripped before typed deserialization. Asset instances collapse to their
//! asset type, one initial position is chosen among the listed alternatives
//! with the caller's seeded RNG, and container flags come from the static
//! container-type table.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::AdapterError;
use crate::domain::models::action::{CONTAINER_ASSET_TYPES, ISOLATED_CONTAINER_TYPES};
use crate::domain::models::constraint::{ConstraintGroup, TemporalConstraint};
use crate::domain::models::entities::RobotKind;
use crate::domain::models::plan::{Plan, StepInput};
use crate::domain::models::scene::{AgentSpec, AssetSpec, ContainerSpec, PositionSpec, SceneSpec};

/// A ground-truth task record after null-stripping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundTruth {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Robot name to robot type.
    #[serde(default)]
    pub robots: BTreeMap<String, String>,
    /// Asset instance name to initial position alternatives.
    #[serde(default)]
    pub init_pos: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub goal_constraints: Vec<ConstraintGroup>,
    #[serde(default)]
    pub temporal_constraints: Vec<TemporalConstraint>,
    /// Reference plan, step-record form.
    #[serde(default)]
    pub time_steps: Option<Vec<StepInput>>,
    /// Reference plan, legacy word-array form.
    #[serde(default)]
    pub ground_truth: Option<Vec<StepInput>>,
}

impl GroundTruth {
    /// Deserialize a raw record, stripping nulls at every nesting level
    /// first.
    pub fn from_value(raw: &Value) -> Result<Self, AdapterError> {
        let stripped = strip_nulls(raw);
        serde_json::from_value(stripped).map_err(|e| AdapterError::Malformed(e.to_string()))
    }

    /// The record's own reference plan, if it carries one.
    pub fn reference_plan(&self) -> Option<Plan> {
        self.time_steps
            .clone()
            .or_else(|| self.ground_truth.clone())
            .map(Plan::from_inputs)
    }

    /// Derive the scene: robots start at self-named positions; each asset
    /// instance collapses to its type and lands on one of its listed
    /// position alternatives.
    pub fn scene(&self, rng: &mut StdRng) -> Result<SceneSpec, AdapterError> {
        let mut spec = SceneSpec::default();

        for (robot, kind_name) in &self.robots {
            let kind =
                RobotKind::from_str(kind_name).ok_or_else(|| AdapterError::UnknownRobotKind {
                    robot: robot.clone(),
                    kind: kind_name.clone(),
                })?;
            spec.agents.insert(
                robot.clone(),
                AgentSpec {
                    kind,
                    pos: Some(PositionSpec::new(robot.clone())),
                },
            );
        }

        for (instance, alternatives) in &self.init_pos {
            if is_robot_placeholder(instance) {
                continue;
            }
            if alternatives.is_empty() {
                return Err(AdapterError::NoInitialPosition(instance.clone()));
            }
            let asset_type = instance
                .rsplit_once('_')
                .map_or(instance.as_str(), |(prefix, _)| prefix);
            let chosen = &alternatives[rng.gen_range(0..alternatives.len())];
            let container = CONTAINER_ASSET_TYPES
                .contains(&asset_type)
                .then(|| ContainerSpec {
                    isolated: ISOLATED_CONTAINER_TYPES.contains(&asset_type),
                });
            // Later instances of the same asset type overwrite earlier ones.
            spec.assets.insert(
                asset_type.to_string(),
                AssetSpec {
                    pos: Some(PositionSpec::new(chosen.clone())),
                    container,
                },
            );
        }

        spec.goal_constraints = self.goal_constraints.clone();
        spec.temporal_constraints = self.temporal_constraints.clone();
        Ok(spec)
    }
}

/// `R1`, `R2`, ... are robot slots, not assets.
fn is_robot_placeholder(name: &str) -> bool {
    let Some(digits) = name.strip_prefix('R') else {
        return false;
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Remove null values from maps and null items from lists, recursively.
/// Empty maps and lists are kept.
pub fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter(|v| !v.is_null())
                .map(strip_nulls)
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "task_id": "1367_10-2",
            "description": "Place the apple onto the bowl.",
            "robots": {"R1": "stompy", "R2": null, "R3": null},
            "init_pos": {
                "R1": null,
                "R2": null,
                "apple_0": ["kitchen work area", "kitchen island area"],
                "apple_1": null,
                "bowl_2": ["kitchen island area"],
                "cabinet_1": ["room_cabinet"]
            },
            "goal_constraints": [[{
                "type": "asset",
                "name": "apple",
                "is_satisfied": true,
                "status": {"is_activated": null, "pos.name": "bowl"}
            }]],
            "temporal_constraints": []
        })
    }

    #[test]
    fn test_strip_nulls_is_deep() {
        let stripped = strip_nulls(&record());
        assert!(stripped["robots"].as_object().unwrap().len() == 1);
        assert!(!stripped["init_pos"].as_object().unwrap().contains_key("apple_1"));
        let status = &stripped["goal_constraints"][0][0]["status"];
        assert!(!status.as_object().unwrap().contains_key("is_activated"));
        assert_eq!(status["pos.name"], "bowl");
        // Empty lists survive.
        assert!(stripped["temporal_constraints"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_scene_derivation() {
        let gt = GroundTruth::from_value(&record()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let scene = gt.scene(&mut rng).unwrap();

        assert_eq!(scene.agents.len(), 1);
        assert_eq!(scene.agents["R1"].kind, RobotKind::Stompy);
        assert_eq!(scene.agents["R1"].pos.as_ref().unwrap().name, "R1");

        // Robot placeholders skipped, instance suffixes stripped.
        assert_eq!(scene.assets.len(), 3);
        assert!(scene.assets.contains_key("apple"));
        let bowl = &scene.assets["bowl"];
        assert_eq!(bowl.pos.as_ref().unwrap().name, "kitchen island area");
        assert!(!bowl.container.as_ref().unwrap().isolated);
        assert!(scene.assets["cabinet"].container.as_ref().unwrap().isolated);
        assert!(scene.assets["apple"].container.is_none());

        assert_eq!(scene.goal_constraints.len(), 1);
    }

    #[test]
    fn test_scene_derivation_is_seed_deterministic() {
        let gt = GroundTruth::from_value(&record()).unwrap();
        let scene_a = gt.scene(&mut StdRng::seed_from_u64(42)).unwrap();
        let scene_b = gt.scene(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(scene_a, scene_b);
    }

    #[test]
    fn test_unknown_robot_type_is_an_error() {
        let raw = json!({"robots": {"R1": "spot"}, "init_pos": {}});
        let gt = GroundTruth::from_value(&raw).unwrap();
        let err = gt.scene(&mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(
            err,
            AdapterError::UnknownRobotKind {
                robot: "R1".to_string(),
                kind: "spot".to_string()
            }
        );
    }

    #[test]
    fn test_empty_alternatives_is_an_error() {
        let raw = json!({
            "robots": {"R1": "fetch"},
            "init_pos": {"apple_0": []}
        });
        let gt = GroundTruth::from_value(&raw).unwrap();
        let err = gt.scene(&mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, AdapterError::NoInitialPosition("apple_0".to_string()));
    }

    #[test]
    fn test_robot_placeholder_detection() {
        assert!(is_robot_placeholder("R1"));
        assert!(is_robot_placeholder("R12"));
        assert!(!is_robot_placeholder("R"));
        assert!(!is_robot_placeholder("Rx"));
        assert!(!is_robot_placeholder("tray_1"));
    }

    #[test]
    fn test_reference_plan_prefers_time_steps() {
        let raw = json!({
            "robots": {"R1": "fetch"},
            "init_pos": {"apple_0": ["kitchen"]},
            "time_steps": [
                {"step": 1, "actions": {"R1": ["Move", "apple"], "R2": null}}
            ]
        });
        let gt = GroundTruth::from_value(&raw).unwrap();
        let plan = gt.reference_plan().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps[0]["R1"], "<Move,apple>");
    }
}
