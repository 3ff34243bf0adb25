//! Scene build metadata: the declarative description a
//! [`World`](crate::services::world::World) is constructed from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::constraint::{ConstraintGroup, TemporalConstraint};
use super::entities::RobotKind;

/// Initial position description for an agent or asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSpec {
    pub name: String,
    #[serde(default)]
    pub isolated: bool,
}

impl PositionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            isolated: false,
        }
    }
}

/// Container parameters for an asset. The interior position is named after
/// the asset itself and starts open unless configured otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    #[serde(default)]
    pub isolated: bool,
}

/// One agent in the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    #[serde(rename = "type")]
    pub kind: RobotKind,
    /// Defaults to a position named after the agent itself.
    #[serde(default)]
    pub pos: Option<PositionSpec>,
}

/// One asset in the scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSpec {
    /// Defaults to a position named after the asset itself.
    #[serde(default)]
    pub pos: Option<PositionSpec>,
    #[serde(default)]
    pub container: Option<ContainerSpec>,
}

/// The full build description: agents, assets and the constraint sets the
/// evaluator monitors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    #[serde(default)]
    pub agents: BTreeMap<String, AgentSpec>,
    #[serde(default)]
    pub assets: BTreeMap<String, AssetSpec>,
    #[serde(default)]
    pub goal_constraints: Vec<ConstraintGroup>,
    #[serde(default)]
    pub temporal_constraints: Vec<TemporalConstraint>,
}

impl SceneSpec {
    /// Convenience builder for an agent with a self-named start position.
    pub fn add_agent(&mut self, name: impl Into<String>, kind: RobotKind) -> &mut Self {
        let name = name.into();
        self.agents.insert(
            name.clone(),
            AgentSpec {
                kind,
                pos: Some(PositionSpec::new(name)),
            },
        );
        self
    }

    /// Convenience builder for a plain asset at a named position.
    pub fn add_asset(&mut self, name: impl Into<String>, pos: impl Into<String>) -> &mut Self {
        self.assets.insert(
            name.into(),
            AssetSpec {
                pos: Some(PositionSpec::new(pos)),
                container: None,
            },
        );
        self
    }

    /// Convenience builder for a container asset at a named position.
    pub fn add_container(
        &mut self,
        name: impl Into<String>,
        pos: impl Into<String>,
        isolated: bool,
    ) -> &mut Self {
        self.assets.insert(
            name.into(),
            AssetSpec {
                pos: Some(PositionSpec::new(pos)),
                container: Some(ContainerSpec { isolated }),
            },
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_spec_builders() {
        let mut spec = SceneSpec::default();
        spec.add_agent("R1", RobotKind::Fetch)
            .add_asset("apple", "kitchen")
            .add_container("cabinet", "room_cabinet", true);

        assert_eq!(spec.agents["R1"].kind, RobotKind::Fetch);
        assert_eq!(spec.assets["apple"].pos.as_ref().unwrap().name, "kitchen");
        assert!(spec.assets["cabinet"].container.as_ref().unwrap().isolated);
    }

    #[test]
    fn test_deserialize_metadata() {
        let spec: SceneSpec = serde_json::from_str(
            r#"{
                "agents": {"R1": {"type": "stompy", "pos": {"name": "R1"}}},
                "assets": {
                    "apple": {"pos": {"name": "kitchen"}},
                    "cabinet": {"pos": {"name": "room_cabinet"}, "container": {"isolated": true}}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(spec.agents.len(), 1);
        assert_eq!(spec.assets.len(), 2);
        assert!(spec.goal_constraints.is_empty());
    }
}
