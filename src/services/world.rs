//! The simulated world: live agent/asset maps and the two transition
//! primitives.
//!
//! `apply` executes one command; `apply_step` executes all commands of one
//! step against the pre-step state by collecting every intended write first
//! and committing them only after the last command has been processed. Both
//! assume commands that already passed the feasibility checker.

use std::collections::BTreeMap;

use tracing::trace;

use crate::domain::error::SceneError;
use crate::domain::models::action::Op;
use crate::domain::models::command::ResolvedCommand;
use crate::domain::models::entities::{Agent, Asset, Param, Placement, Position};
use crate::domain::models::scene::SceneSpec;

/// Entity state for one evaluation. Built once from a [`SceneSpec`];
/// mutated only through [`World::apply`] / [`World::apply_step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    agents: BTreeMap<String, Agent>,
    assets: BTreeMap<String, Asset>,
}

impl World {
    /// Build the entity maps and link every asset sitting at a container
    /// asset's name to that container's interior position.
    pub fn build(spec: &SceneSpec) -> Result<Self, SceneError> {
        let mut agents = BTreeMap::new();
        let mut assets = BTreeMap::new();

        for (name, agent_spec) in &spec.agents {
            let pos = agent_spec.pos.as_ref().map_or_else(
                || Position::new(name.clone()),
                |p| Position::with_isolation(p.name.clone(), p.isolated),
            );
            agents.insert(
                name.clone(),
                Agent::new(name.clone(), agent_spec.kind, pos),
            );
        }

        for (name, asset_spec) in &spec.assets {
            if agents.contains_key(name) {
                return Err(SceneError::AmbiguousName(name.clone()));
            }
            let pos = asset_spec.pos.as_ref().map_or_else(
                || Position::new(name.clone()),
                |p| Position::with_isolation(p.name.clone(), p.isolated),
            );
            let mut asset = Asset::new(name.clone(), Placement::At(pos));
            if let Some(container) = &asset_spec.container {
                asset = asset.into_container(container.isolated);
            }
            assets.insert(name.clone(), asset);
        }

        // Re-home assets whose initial position names a container asset.
        let container_names: Vec<String> = assets
            .values()
            .filter(|a| a.is_container)
            .map(|a| a.name.clone())
            .collect();
        for asset in assets.values_mut() {
            if let Placement::At(pos) = &asset.placement {
                if container_names.iter().any(|c| *c == pos.name) {
                    let container = pos.name.clone();
                    asset.placement = Placement::Inside(container);
                }
            }
        }

        Ok(Self { agents, assets })
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    pub fn agents(&self) -> &BTreeMap<String, Agent> {
        &self.agents
    }

    pub fn assets(&self) -> &BTreeMap<String, Asset> {
        &self.assets
    }

    pub fn has_agent(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    pub fn has_asset(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// An asset's effective position: its own free position, or the live
    /// interior position of the container it resides in.
    pub fn asset_position(&self, asset: &Asset) -> Position {
        match &asset.placement {
            Placement::At(pos) => pos.clone(),
            Placement::Inside(container) => self
                .assets
                .get(container)
                .and_then(|c| c.container_position.clone())
                .unwrap_or_else(|| Position::new(container.clone())),
        }
    }

    /// The effective position of any resolved parameter.
    pub fn param_position(&self, param: &Param) -> Option<Position> {
        match param {
            Param::Agent(name) => self.agents.get(name).map(|a| a.pos.clone()),
            Param::Asset(name) => self.assets.get(name).map(|a| self.asset_position(a)),
            Param::Position(pos) => Some(pos.clone()),
        }
    }

    /// Apply a single command.
    pub fn apply(&mut self, command: &ResolvedCommand) {
        let mut effects = StepEffects::default();
        self.collect_effects(command, &mut effects);
        self.commit(effects);
    }

    /// Apply all commands of one step with snapshot semantics: every command
    /// observes the pre-step state, and writes land atomically afterwards.
    pub fn apply_step(&mut self, commands: &[ResolvedCommand]) {
        let mut effects = StepEffects::default();
        for command in commands {
            trace!(op = %command.op, "collecting step effects");
            self.collect_effects(command, &mut effects);
        }
        self.commit(effects);
    }

    #[allow(clippy::too_many_lines)]
    fn collect_effects(&self, command: &ResolvedCommand, effects: &mut StepEffects) {
        let Some(op) = Op::from_str(&command.op) else {
            return;
        };
        let Some(Param::Agent(agent_name)) = command.params.first() else {
            return;
        };
        let Some(agent) = self.agents.get(agent_name) else {
            return;
        };

        match op {
            Op::Move => {
                let Some(target) = command.params.get(1) else {
                    return;
                };
                let delta = effects.agent(agent_name);
                delta.pos = Some(Position::new(target.name()));
                delta.reached = Some(Vec::new());
            }
            Op::Reach => {
                let Some(target) = command.params.get(1) else {
                    return;
                };
                let mut reached = agent.reached_objects.clone();
                if !reached.is_empty() && reached.len() >= agent.end_effector_num {
                    reached.remove(0);
                }
                reached.push(target.name().to_string());
                effects.agent(agent_name).reached = Some(reached);
            }
            Op::Grasp => {
                let mut carried = agent.carried_objects.clone();
                for name in &agent.reached_objects {
                    let Some(asset) = self.assets.get(name) else {
                        continue;
                    };
                    carried.push(name.clone());
                    let mut grasped_by = asset.is_grasped_by.clone();
                    grasped_by.push(agent_name.clone());
                    let delta = effects.asset(name);
                    delta.grasped_by = Some(grasped_by);
                    delta.placement = Some(Placement::at(agent_name.clone()));
                }
                let delta = effects.agent(agent_name);
                delta.reached = Some(Vec::new());
                delta.carried = Some(carried);
            }
            Op::Place => {
                let Some(dest) = command.params.get(1) else {
                    return;
                };
                let dest_placement = match dest {
                    Param::Position(pos) => Placement::At(pos.clone()),
                    Param::Asset(name) => match self.assets.get(name) {
                        Some(d) if d.container_position.is_some() => {
                            Placement::Inside(name.clone())
                        }
                        Some(d) => d.placement.clone(),
                        None => return,
                    },
                    Param::Agent(name) => match self.agents.get(name) {
                        Some(d) => Placement::At(d.pos.clone()),
                        None => return,
                    },
                };
                for name in &agent.carried_objects {
                    let Some(asset) = self.assets.get(name) else {
                        continue;
                    };
                    let delta = effects.asset(name);
                    delta.placement = Some(dest_placement.clone());
                    delta.grasped_by = Some(
                        asset
                            .is_grasped_by
                            .iter()
                            .filter(|g| *g != agent_name)
                            .cloned()
                            .collect(),
                    );
                }
                effects.agent(agent_name).carried = Some(Vec::new());
            }
            Op::Open | Op::Close => {
                let Some(Param::Asset(name)) = command.params.get(1) else {
                    return;
                };
                effects.asset(name).container_isolated = Some(op == Op::Close);
            }
            Op::Handover => {
                let (Some(Param::Asset(asset_name)), Some(Param::Agent(receiver_name))) =
                    (command.params.get(1), command.params.get(2))
                else {
                    return;
                };
                let (Some(asset), Some(receiver)) = (
                    self.assets.get(asset_name),
                    self.agents.get(receiver_name),
                ) else {
                    return;
                };

                let giver_carried: Vec<String> = agent
                    .carried_objects
                    .iter()
                    .filter(|n| *n != asset_name)
                    .cloned()
                    .collect();
                let mut receiver_carried = receiver.carried_objects.clone();
                receiver_carried.push(asset_name.clone());
                let mut grasped_by: Vec<String> = asset
                    .is_grasped_by
                    .iter()
                    .filter(|g| *g != agent_name)
                    .cloned()
                    .collect();
                grasped_by.push(receiver_name.clone());

                effects.agent(agent_name).carried = Some(giver_carried);
                effects.agent(receiver_name).carried = Some(receiver_carried);
                let delta = effects.asset(asset_name);
                delta.grasped_by = Some(grasped_by);
                delta.pos_name = Some(receiver_name.clone());
            }
            Op::Interact => {
                let Some(Param::Asset(name)) = command.params.get(1) else {
                    return;
                };
                effects.asset(name).activated = Some(true);
            }
            Op::Push => {
                let (Some(Param::Asset(pushed)), Some(dest)) =
                    (command.params.get(1), command.params.get(2))
                else {
                    return;
                };
                effects.agent(agent_name).pos_name = Some(pushed.clone());
                effects.asset(pushed).pos_name = Some(dest.name().to_string());
            }
        }
    }

    fn commit(&mut self, effects: StepEffects) {
        for (name, delta) in effects.agents {
            let Some(agent) = self.agents.get_mut(&name) else {
                continue;
            };
            if let Some(pos) = delta.pos {
                agent.pos = pos;
            }
            if let Some(pos_name) = delta.pos_name {
                agent.pos.name = pos_name;
            }
            if let Some(reached) = delta.reached {
                agent.reached_objects = reached;
            }
            if let Some(carried) = delta.carried {
                agent.carried_objects = carried;
            }
        }
        for (name, delta) in effects.assets {
            let Some(asset) = self.assets.get_mut(&name) else {
                continue;
            };
            if let Some(placement) = delta.placement {
                asset.placement = placement;
            }
            if let Some(pos_name) = delta.pos_name {
                match &mut asset.placement {
                    Placement::At(pos) => pos.name = pos_name,
                    Placement::Inside(_) => asset.placement = Placement::at(pos_name),
                }
            }
            if let Some(grasped_by) = delta.grasped_by {
                asset.is_grasped_by = grasped_by;
            }
            if let Some(activated) = delta.activated {
                asset.is_activated = activated;
            }
            if let Some(isolated) = delta.container_isolated {
                if let Some(interior) = asset.container_position.as_mut() {
                    interior.isolated = isolated;
                }
            }
        }
    }
}

/// Writes queued during a step, keyed by entity name. Later commands in the
/// same step overwrite earlier writes to the same field.
#[derive(Debug, Default)]
struct StepEffects {
    agents: BTreeMap<String, AgentDelta>,
    assets: BTreeMap<String, AssetDelta>,
}

impl StepEffects {
    fn agent(&mut self, name: &str) -> &mut AgentDelta {
        self.agents.entry(name.to_string()).or_default()
    }

    fn asset(&mut self, name: &str) -> &mut AssetDelta {
        self.assets.entry(name.to_string()).or_default()
    }
}

#[derive(Debug, Default)]
struct AgentDelta {
    pos: Option<Position>,
    /// Renames the current position in place, preserving isolation.
    pos_name: Option<String>,
    reached: Option<Vec<String>>,
    carried: Option<Vec<String>>,
}

#[derive(Debug, Default)]
struct AssetDelta {
    placement: Option<Placement>,
    pos_name: Option<String>,
    grasped_by: Option<Vec<String>>,
    activated: Option<bool>,
    container_isolated: Option<bool>,
}
