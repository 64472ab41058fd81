//! Agent system - per-tick update of every entity, and culling of the dead
//!
//! Each living entity, in population order: pays metabolism, runs its role
//! behavior, moves according to its stance, then dies if its energy is
//! spent. Entities never see each other inside a tick; the engine-provided
//! [`TickContext`] is their only channel outward.

use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use super::events::EventLog;
use super::movement::move_agent;
use super::roles::role_system;
use crate::biome::Biome;
use crate::components::*;

/// Energy burned by every living entity each tick
pub const METABOLIC_COST: f64 = 0.1;

/// Engine state lent to an entity for the duration of its update
pub struct TickContext<'a, R: Rng> {
    pub rng: &'a mut R,
    pub log: &'a mut EventLog,
}

/// Mutable view over one entity's components
pub struct AgentMut<'a> {
    pub id: AgentId,
    pub role: Role,
    pub stance: Stance,
    pub pos: &'a mut GridPos,
    pub vitals: &'a mut Vitals,
    pub traits: &'a mut Traits,
    pub memory: &'a mut Memory,
}

/// Update a single entity. Does nothing if it is already dead.
pub fn update_agent<R: Rng>(agent: &mut AgentMut<'_>, biome: &Biome, ctx: &mut TickContext<'_, R>) {
    if !agent.vitals.alive {
        return;
    }

    agent.vitals.energy -= METABOLIC_COST;

    role_system(agent, biome, ctx);

    agent.vitals.energy -= move_agent(
        agent.pos,
        agent.stance,
        biome.width(),
        biome.height(),
        ctx.rng,
    );

    if agent.vitals.is_spent() {
        agent.vitals.alive = false;
        ctx.log.push(format!("Entity {} expired.", agent.id));
        debug!(id = agent.id.0, role = %agent.role, "entity expired");
    }
}

/// Entity handles sorted by id
pub fn population_order(world: &World) -> Vec<Entity> {
    let mut order: Vec<(AgentId, Entity)> = world
        .query::<&AgentId>()
        .iter()
        .map(|(entity, id)| (*id, entity))
        .collect();
    order.sort_unstable_by_key(|(id, _)| *id);
    order.into_iter().map(|(_, entity)| entity).collect()
}

/// Update every entity in population order. Returns the ids that died.
pub fn agent_system<R: Rng>(
    world: &mut World,
    biome: &Biome,
    ctx: &mut TickContext<'_, R>,
) -> Vec<AgentId> {
    let mut deaths = Vec::new();

    for entity in population_order(world) {
        let Ok((id, role, stance, pos, vitals, traits, memory)) = world
            .query_one_mut::<(
                &AgentId,
                &Role,
                &Stance,
                &mut GridPos,
                &mut Vitals,
                &mut Traits,
                &mut Memory,
            )>(entity)
        else {
            continue;
        };

        let was_alive = vitals.alive;
        let mut agent = AgentMut {
            id: *id,
            role: *role,
            stance: *stance,
            pos,
            vitals,
            traits,
            memory,
        };
        update_agent(&mut agent, biome, ctx);

        if was_alive && !agent.vitals.alive {
            deaths.push(agent.id);
        }
    }

    deaths
}

/// Permanently remove every dead entity. Returns the removed ids.
pub fn cull_dead(world: &mut World) -> Vec<AgentId> {
    let dead: Vec<(Entity, AgentId)> = world
        .query::<(&AgentId, &Vitals)>()
        .iter()
        .filter(|(_, (_, vitals))| !vitals.alive)
        .map(|(entity, (id, _))| (entity, *id))
        .collect();

    for (entity, _) in &dead {
        let _ = world.despawn(*entity);
    }

    let mut ids: Vec<AgentId> = dead.into_iter().map(|(_, id)| id).collect();
    ids.sort_unstable();
    ids
}
