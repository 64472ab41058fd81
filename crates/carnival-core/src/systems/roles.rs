//! Role system - per-role stochastic behavior
//!
//! Every role reacts independently to its own Bernoulli draws; no role looks
//! at other entities. Fool and Predator are reserved arms that currently have
//! no effect (the fool still consumes its draw, as does the mystic's crystal
//! sight).

use rand::Rng;

use super::agents::{AgentMut, TickContext};
use crate::biome::Biome;
use crate::components::Role;

const MYSTIC_SIGHT_CHANCE: f64 = 0.2;
const MYSTIC_VISION_CHANCE: f64 = 0.01;
const SKEPTIC_PREDICTION_CHANCE: f64 = 0.025;
const FOOL_RECALL_CHANCE: f64 = 0.33;
const PIRATE_TIDE: f64 = 0.05;
const CURIOSITY_STEP: f64 = 0.001;
const STORY_CHANCE: f64 = 0.01;

/// Flavor lines a storyteller picks from
pub const STORIES: [&str; 3] = ["Once upon a time...", "The dice rolled...", "In the depths..."];

/// Apply the role behavior of one living entity
pub fn role_system<R: Rng>(agent: &mut AgentMut<'_>, biome: &Biome, ctx: &mut TickContext<'_, R>) {
    match agent.role {
        Role::Mystic => {
            // Crystal scanning is unimplemented
            let _crystal_sight = ctx.rng.gen::<f64>() < MYSTIC_SIGHT_CHANCE;
            if ctx.rng.gen::<f64>() < MYSTIC_VISION_CHANCE {
                agent.vitals.foresight += 1;
                agent.memory.remember("Had a vision.");
                ctx.log.push(format!("Mystic {} has a vision.", agent.id));
            }
        }
        Role::Skeptic => {
            if ctx.rng.gen::<f64>() < SKEPTIC_PREDICTION_CHANCE {
                agent.vitals.foresight += 1;
                agent.memory.remember("Made a prediction.");
                ctx.log.push(format!("Skeptic {} predicts something.", agent.id));
            }
        }
        Role::Fool => {
            // Recall and false memory are both unimplemented
            let _recalls = ctx.rng.gen::<f64>() < FOOL_RECALL_CHANCE;
        }
        Role::Pirate => {
            if biome.is_sea(agent.pos.x, agent.pos.y) {
                agent.vitals.energy += PIRATE_TIDE;
            } else {
                agent.vitals.energy -= PIRATE_TIDE;
            }
        }
        Role::Kid => {
            if ctx.rng.gen::<f64>() < agent.traits.curiosity {
                agent.traits.curiosity = (agent.traits.curiosity + CURIOSITY_STEP).min(1.0);
            }
        }
        Role::Storyteller => {
            if ctx.rng.gen::<f64>() < STORY_CHANCE {
                let story = STORIES[ctx.rng.gen_range(0..STORIES.len())];
                agent.memory.remember(story);
                ctx.log.push(format!("Storyteller {}: {}", agent.id, story));
            }
        }
        Role::Chicken => {
            agent.traits.curiosity = (agent.traits.curiosity - CURIOSITY_STEP).max(0.0);
        }
        Role::Predator | Role::Normal => {}
    }
}
