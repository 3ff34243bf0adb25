//! Feasibility checking: pure predicates over the current world.
//!
//! Nothing here mutates state. The checker answers three questions: is a
//! single command feasible right now, are two positions transitively aligned,
//! and is a whole step's command set mutually compatible.

use std::collections::{BTreeMap, HashSet};

use crate::domain::models::action::{ActionSpec, Op};
use crate::domain::models::command::ResolvedCommand;
use crate::domain::models::entities::{Agent, Param, Placement, Position};
use crate::services::world::World;

/// Whether `pos` is reachable from `target` by transitively following
/// position-name links through agents and assets, or matches directly.
///
/// Worlds may contain positional cycles (`A.pos = B, B.pos = A`); the
/// visited set terminates the walk and such lookups resolve to `false`
/// for positions not on the chain.
pub fn aligned_position(world: &World, target: &Param, pos: &Position) -> bool {
    let mut visited = HashSet::new();
    aligned_position_guarded(world, target, pos, &mut visited)
}

fn aligned_position_guarded(
    world: &World,
    target: &Param,
    pos: &Position,
    visited: &mut HashSet<String>,
) -> bool {
    let (target_name, target_pos_name) = match target {
        // Anonymous positions carry no further links.
        Param::Position(p) => return p.name == pos.name,
        Param::Agent(name) => match world.agent(name) {
            Some(agent) => (name.as_str(), agent.pos.name.clone()),
            None => return false,
        },
        Param::Asset(name) => match world.asset(name) {
            Some(asset) => (name.as_str(), world.asset_position(asset).name),
            None => return false,
        },
    };

    if world.has_asset(&target_pos_name) {
        if !visited.insert(target_pos_name.clone()) {
            return false;
        }
        return aligned_position_guarded(
            world,
            &Param::Asset(target_pos_name.clone()),
            pos,
            visited,
        ) || target_pos_name == pos.name;
    }
    if world.has_agent(&target_pos_name) {
        if !visited.insert(target_pos_name.clone()) {
            return false;
        }
        return aligned_position_guarded(
            world,
            &Param::Agent(target_pos_name.clone()),
            pos,
            visited,
        ) || target_pos_name == pos.name;
    }

    target_pos_name == pos.name || target_name == pos.name
}

/// Agent-to-entity adjacency: the agent stands at the entity, or the entity
/// sits at the agent.
fn relative_position(world: &World, agent: &Agent, target: &Param) -> bool {
    if matches!(target, Param::Position(_)) {
        return false;
    }
    let Some(target_pos) = world.param_position(target) else {
        return false;
    };
    agent.pos.name == target.name() || agent.name == target_pos.name
}

/// Positional typing and name-scope check for the parameters after the
/// acting agent.
fn signature_matches(spec: &ActionSpec, targets: &[Param]) -> bool {
    if targets.len() != spec.param_types.len() {
        return false;
    }
    for (target, kinds) in targets.iter().zip(spec.param_types) {
        if !kinds.contains(&target.kind()) {
            return false;
        }
    }
    for (target, scope) in targets.iter().zip(spec.param_scopes) {
        if !scope.is_empty() && !scope.contains(&target.name()) {
            return false;
        }
    }
    true
}

/// Whether one command is feasible against the current world.
///
/// `params[0]` must be the acting agent. Unknown operation names, capability
/// mismatches and signature mismatches are all plain infeasibility.
#[allow(clippy::too_many_lines)]
pub fn action_feasible(world: &World, op_name: &str, params: &[Param]) -> bool {
    let Some(Param::Agent(agent_name)) = params.first() else {
        return false;
    };
    let Some(agent) = world.agent(agent_name) else {
        return false;
    };
    let Some(op) = Op::from_str(op_name) else {
        return false;
    };
    if !agent.can_perform(op) {
        return false;
    }
    if !signature_matches(ActionSpec::of(op), &params[1..]) {
        return false;
    }

    let acting = Param::Agent(agent_name.clone());
    match op {
        Op::Move => true,
        Op::Reach => {
            let Some(target) = params.get(1) else {
                return false;
            };
            let Some(target_pos) = world.param_position(target) else {
                return false;
            };
            let accessible = aligned_position(world, &acting, &target_pos)
                || aligned_position(world, target, &agent.pos);
            accessible && !target_pos.isolated
        }
        Op::Grasp => {
            let Some(Param::Asset(name)) = params.get(1) else {
                return false;
            };
            let Some(asset) = world.asset(name) else {
                return false;
            };
            !asset.is_grasped() && agent.has_free_end_effector() && agent.has_reached(name)
        }
        Op::Place => {
            if agent.carried_objects.is_empty() {
                return false;
            }
            match params.get(1) {
                Some(dest @ Param::Asset(name)) => {
                    let Some(dest_asset) = world.asset(name) else {
                        return false;
                    };
                    let dest_pos = world.asset_position(dest_asset);
                    let mut accessible = aligned_position(world, &acting, &dest_pos)
                        || aligned_position(world, dest, &agent.pos);
                    if let Some(interior) = &dest_asset.container_position {
                        accessible = accessible && !interior.isolated;
                    }
                    accessible
                }
                Some(Param::Position(pos)) => aligned_position(world, &acting, pos),
                _ => false,
            }
        }
        Op::Open | Op::Close => {
            let Some(target @ Param::Asset(name)) = params.get(1) else {
                return false;
            };
            let Some(asset) = world.asset(name) else {
                return false;
            };
            let Some(interior) = &asset.container_position else {
                return false;
            };
            // Open wants a currently closed interior; close wants it open.
            interior.isolated == (op == Op::Open)
                && relative_position(world, agent, target)
                && agent.has_free_end_effector()
                && agent.has_reached(name)
        }
        Op::Handover => {
            let (Some(Param::Asset(asset_name)), Some(receiver_param @ Param::Agent(receiver))) =
                (params.get(1), params.get(2))
            else {
                return false;
            };
            let Some(receiver_agent) = world.agent(receiver) else {
                return false;
            };
            relative_position(world, agent, receiver_param)
                && agent.is_carrying(asset_name)
                && receiver_agent.has_free_end_effector()
        }
        Op::Interact => {
            let Some(target @ Param::Asset(name)) = params.get(1) else {
                return false;
            };
            let Some(asset) = world.asset(name) else {
                return false;
            };
            if agent.end_effector_num > 0
                && !agent.is_carrying(name)
                && !agent.has_free_end_effector()
            {
                return false;
            }
            relative_position(world, agent, target) && !asset.is_activated
        }
        Op::Push => {
            let Some(target) = params.get(1) else {
                return false;
            };
            relative_position(world, agent, target)
        }
    }
}

/// Pairwise operation compatibility for two commands touching the same
/// asset within one step.
///
/// ```text
///              MOVE REACH GRASP PLACE OPEN CLOSE HANDOVER INTERACT PUSH
/// MOVE          o    o     o     o     o    o      o        o       o
/// REACH         o    o     x     o     x    x      x        x       x
/// GRASP         o    x     x     x     x    x      x        x       x
/// PLACE         o    o     x     o     x    x      x        x       x
/// OPEN          o    x     x     x     x    x      x        x       x
/// CLOSE         o    x     x     x     x    x      x        x       x
/// HANDOVER      o    x     x     x     x    x      x        x       x
/// INTERACT      o    x     x     x     x    x      x        x       x
/// PUSH          o    x     x     x     x    x      x        x       x
/// ```
fn compatible_pair(a: Op, b: Op) -> bool {
    if a == Op::Move || b == Op::Move {
        return true;
    }
    matches!(a, Op::Reach | Op::Place) && matches!(b, Op::Reach | Op::Place)
}

/// Whether all commands of one step may execute concurrently.
pub fn step_compatible(world: &World, commands: &[ResolvedCommand]) -> bool {
    // Two commands may not share their first parameter. Commands without one
    // slip past this check.
    let mut first_params = HashSet::new();
    for command in commands {
        if let Some(param) = command.params.get(1) {
            if !first_params.insert(param.name().to_string()) {
                return false;
            }
        }
    }

    // Every asset referenced by more than one command must pass the pairwise
    // matrix for each pair of touching operations.
    let mut referenced: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, command) in commands.iter().enumerate() {
        for param in command.params.iter().skip(1) {
            if let Param::Asset(name) = param {
                referenced.entry(name.as_str()).or_default().push(idx);
            }
        }
    }
    for indices in referenced.values() {
        if indices.len() < 2 {
            continue;
        }
        for (i, &a) in indices.iter().enumerate() {
            for &b in &indices[i + 1..] {
                let (Some(op_a), Some(op_b)) = (commands[a].op_kind(), commands[b].op_kind())
                else {
                    return false;
                };
                if !compatible_pair(op_a, op_b) {
                    return false;
                }
            }
        }
    }

    // A closing container excludes same-step commands on its occupants,
    // except other moves and closes.
    let closing = commands
        .iter()
        .find(|command| command.op_kind() == Some(Op::Close));
    if let Some(close_command) = closing {
        if let Some(Param::Asset(container)) = close_command.params.get(1) {
            for command in commands {
                if matches!(command.op_kind(), Some(Op::Move | Op::Close)) {
                    continue;
                }
                for param in command.params.iter().skip(1) {
                    let Param::Asset(name) = param else {
                        continue;
                    };
                    let inside = world
                        .asset(name)
                        .is_some_and(|a| a.placement == Placement::Inside(container.clone()));
                    if inside {
                        return false;
                    }
                }
            }
        }
    }

    true
}
