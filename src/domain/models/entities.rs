//! Core entity model: positions, assets, agents and command parameters.
//!
//! Entities are owned by the [`World`](crate::services::world::World) and are
//! addressed by name; cross-entity references (`is_grasped_by`,
//! `carried_objects`, containment) are stored as names so that positional
//! cycles between entities stay representable.

use serde::{Deserialize, Serialize};

use super::action::Op;

/// A named location. `isolated` marks a closed space (e.g. a shut cabinet)
/// that blocks reach/place from the outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub name: String,
    #[serde(default)]
    pub isolated: bool,
}

impl Position {
    /// An open position with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            isolated: false,
        }
    }

    pub fn with_isolation(name: impl Into<String>, isolated: bool) -> Self {
        Self {
            name: name.into(),
            isolated,
        }
    }
}

/// Where an asset currently sits.
///
/// Containment is an explicit link rather than a shared position value:
/// an occupant's effective position is resolved through the container's
/// live `container_position`, so toggling the container's isolation is
/// instantly observable for every occupant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// A free-standing position owned by the asset itself.
    At(Position),
    /// Inside the named container asset.
    Inside(String),
}

impl Placement {
    pub fn at(name: impl Into<String>) -> Self {
        Self::At(Position::new(name))
    }
}

/// A manipulable object in the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub placement: Placement,
    /// Names of agents currently grasping this asset.
    pub is_grasped_by: Vec<String>,
    /// Whether the asset has been interacted with (e.g. a toaster turned on).
    pub is_activated: bool,
    pub is_container: bool,
    /// Synthesized interior position; present iff `is_container`.
    pub container_position: Option<Position>,
}

impl Asset {
    pub fn new(name: impl Into<String>, placement: Placement) -> Self {
        Self {
            name: name.into(),
            placement,
            is_grasped_by: Vec::new(),
            is_activated: false,
            is_container: false,
            container_position: None,
        }
    }

    /// Promote this asset to a container with an interior position named
    /// after the asset itself.
    pub fn into_container(mut self, isolated: bool) -> Self {
        self.is_container = true;
        self.container_position = Some(Position::with_isolation(self.name.clone(), isolated));
        self
    }

    pub fn is_grasped(&self) -> bool {
        !self.is_grasped_by.is_empty()
    }
}

/// The fixed robot types and their static capability tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotKind {
    Panda,
    Fetch,
    UnitreeGo2,
    UnitreeH1,
    Stompy,
    AnymalC,
}

impl RobotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Panda => "panda",
            Self::Fetch => "fetch",
            Self::UnitreeGo2 => "unitree_go2",
            Self::UnitreeH1 => "unitree_h1",
            Self::Stompy => "stompy",
            Self::AnymalC => "anymal_c",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "panda" => Some(Self::Panda),
            "fetch" => Some(Self::Fetch),
            "unitree_go2" => Some(Self::UnitreeGo2),
            "unitree_h1" => Some(Self::UnitreeH1),
            "stompy" => Some(Self::Stompy),
            "anymal_c" => Some(Self::AnymalC),
            _ => None,
        }
    }

    /// Operations this robot type is able to execute.
    pub fn actions(&self) -> &'static [Op] {
        use Op::{Close, Grasp, Handover, Interact, Move, Open, Place, Push, Reach};
        match self {
            Self::Panda => &[Reach, Grasp, Place, Open, Close, Handover, Interact],
            Self::Fetch | Self::UnitreeH1 | Self::Stompy => {
                &[Move, Reach, Grasp, Place, Open, Close, Handover, Interact]
            }
            Self::UnitreeGo2 | Self::AnymalC => &[Move, Push, Interact],
        }
    }

    /// Number of end effectors, bounding concurrent reach/grasp holdings.
    pub fn end_effectors(&self) -> usize {
        match self {
            Self::Panda | Self::Fetch => 1,
            Self::UnitreeH1 | Self::Stompy => 2,
            Self::UnitreeGo2 | Self::AnymalC => 0,
        }
    }
}

/// A robot in the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub name: String,
    pub kind: RobotKind,
    pub pos: Position,
    pub end_effector_num: usize,
    /// Names of entities currently reached (oldest first).
    pub reached_objects: Vec<String>,
    /// Names of assets currently carried.
    pub carried_objects: Vec<String>,
}

impl Agent {
    pub fn new(name: impl Into<String>, kind: RobotKind, pos: Position) -> Self {
        Self {
            name: name.into(),
            kind,
            pos,
            end_effector_num: kind.end_effectors(),
            reached_objects: Vec::new(),
            carried_objects: Vec::new(),
        }
    }

    pub fn can_perform(&self, op: Op) -> bool {
        self.kind.actions().contains(&op)
    }

    pub fn has_free_end_effector(&self) -> bool {
        self.end_effector_num > self.carried_objects.len()
    }

    pub fn has_reached(&self, name: &str) -> bool {
        self.reached_objects.iter().any(|n| n == name)
    }

    pub fn is_carrying(&self, name: &str) -> bool {
        self.carried_objects.iter().any(|n| n == name)
    }
}

/// The kind of entity a command parameter resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Agent,
    Asset,
    Position,
}

/// A resolved command parameter.
///
/// Agents and assets are referenced by name into the world's entity maps;
/// positions carry their value directly (they are anonymous, synthesized
/// during resolution for `move`/`place` targets and by the constraint
/// monitor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Agent(String),
    Asset(String),
    Position(Position),
}

impl Param {
    pub fn name(&self) -> &str {
        match self {
            Self::Agent(name) | Self::Asset(name) => name,
            Self::Position(pos) => &pos.name,
        }
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Agent(_) => ParamKind::Agent,
            Self::Asset(_) => ParamKind::Asset,
            Self::Position(_) => ParamKind::Position,
        }
    }

    pub fn as_asset_name(&self) -> Option<&str> {
        match self {
            Self::Asset(name) => Some(name),
            _ => None,
        }
    }
}
