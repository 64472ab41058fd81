//! Population generation

use hecs::{Entity, World};
use rand::Rng;

use crate::components::*;
use crate::config::WorldConfig;

/// Spawn one entity with creation-time defaults.
///
/// When `role` is None the role is drawn from the role table. Draw order:
/// role (if drawn), bravery, curiosity, then genes.
pub fn spawn_agent(
    world: &mut World,
    id: AgentId,
    pos: GridPos,
    role: Option<Role>,
    energy: f64,
    rng: &mut impl Rng,
) -> Entity {
    let role = role.unwrap_or_else(|| Role::random(rng));
    let traits = Traits::random(rng);
    let genes = Genes::random(rng, traits.curiosity);

    world.spawn((
        id,
        pos,
        role,
        Vitals::new(energy),
        traits,
        genes,
        ConsentKanban::new(),
        Stance::Dormant,
        Memory::new(),
    ))
}

/// Generate the starting population with ids `0..config.population`.
///
/// The first `min_mystics` entities are mystics and the next `min_skeptics`
/// are skeptics; everyone else draws from the role table.
pub fn generate_population(
    world: &mut World,
    config: &WorldConfig,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let mut entities = Vec::with_capacity(config.population as usize);
    let skeptic_end = config.min_mystics + config.min_skeptics;

    for i in 0..config.population {
        let pos = GridPos::new(
            rng.gen_range(0..config.width),
            rng.gen_range(0..config.height),
        );

        let role = if i < config.min_mystics {
            Some(Role::Mystic)
        } else if i < skeptic_end {
            Some(Role::Skeptic)
        } else {
            None
        };

        let entity = spawn_agent(world, AgentId(i), pos, role, config.starting_energy, rng);
        entities.push(entity);
    }

    entities
}
