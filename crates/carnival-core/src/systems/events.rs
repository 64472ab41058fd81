//! Events system - the narrative log and spiral-die world events
//!
//! World events punctuate the simulation: storms drain everyone, gemstones
//! reward one lucky entity, discoveries and calm winds only make the log.

use hecs::World;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

use crate::components::{AgentId, Memory, Vitals};
use crate::dice::{roll_spiral_die, Outcome, Roll};

/// Energy drained from every entity by a storm
pub const HAZARD_DRAIN: f64 = 5.0;
/// Energy granted to the finder of a gemstone
pub const TREASURE_ENERGY: f64 = 10.0;

/// Append-only narrative log that keeps the most recent lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl EventLog {
    /// Log retaining `capacity` lines (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a line, evicting the oldest when full
    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// The `n` newest lines, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        self.iter().skip(self.lines.len().saturating_sub(n))
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// What a world event did
#[derive(Debug, Clone, PartialEq)]
pub struct WorldEvent {
    pub roll: Roll,
    /// Finder of a gemstone, if there was anyone alive to find it
    pub target: Option<AgentId>,
    pub description: String,
}

/// Roll the spiral die and apply the outcome to the population.
///
/// Always appends exactly one narrative line to `log`.
pub fn world_event_system(
    world: &mut World,
    log: &mut EventLog,
    rng: &mut impl Rng,
    strain: &str,
    resonance: f64,
    scale: f64,
) -> WorldEvent {
    let roll = roll_spiral_die(rng, scale, resonance);
    let mut description = format!("The {strain} strain shimmers...");
    let mut target = None;

    match roll.outcome {
        Outcome::Hazard => {
            description.push_str(" A STORM hits! Energy drains.");
            for (_, vitals) in world.query_mut::<&mut Vitals>() {
                vitals.energy -= HAZARD_DRAIN;
            }
        }
        Outcome::Treasure => {
            description.push_str(" A GEMSTONE found!");
            target = reward_random_survivor(world, rng);
            if target.is_none() {
                description.push_str(" No one is left to claim it.");
            }
        }
        Outcome::Discovery => description.push_str(" New lands discovered."),
        Outcome::Stasis => description.push_str(" Winds are calm."),
    }

    debug!(outcome = %roll.outcome, magnitude = roll.magnitude, "world event");
    log.push(description.clone());

    WorldEvent {
        roll,
        target,
        description,
    }
}

/// Grant a gemstone to a uniformly random living entity (population order)
fn reward_random_survivor(world: &mut World, rng: &mut impl Rng) -> Option<AgentId> {
    let mut alive: Vec<(AgentId, hecs::Entity)> = world
        .query::<(&AgentId, &Vitals)>()
        .iter()
        .filter(|(_, (_, vitals))| vitals.alive)
        .map(|(entity, (id, _))| (*id, entity))
        .collect();

    if alive.is_empty() {
        return None;
    }
    alive.sort_unstable_by_key(|(id, _)| *id);

    let (id, entity) = alive[rng.gen_range(0..alive.len())];
    let (vitals, memory) = world
        .query_one_mut::<(&mut Vitals, &mut Memory)>(entity)
        .ok()?;
    vitals.treasures += 1;
    vitals.energy += TREASURE_ENERGY;
    memory.remember("Found a gemstone.");

    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{GridPos, Role};
    use crate::generation::spawn_agent;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world_with(energies: &[f64], rng: &mut ChaCha8Rng) -> World {
        let mut world = World::new();
        for (i, &energy) in energies.iter().enumerate() {
            spawn_agent(
                &mut world,
                AgentId(i as u32),
                GridPos::new(0, 0),
                Some(Role::Normal),
                energy,
                rng,
            );
        }
        world
    }

    #[test]
    fn test_log_evicts_oldest() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.push(format!("line {i}"));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.iter().collect::<Vec<_>>(), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(log.last(), Some("line 4"));
    }

    #[test]
    fn test_log_recent() {
        let mut log = EventLog::new(10);
        for i in 0..4 {
            log.push(format!("{i}"));
        }
        assert_eq!(log.recent(2).collect::<Vec<_>>(), vec!["2", "3"]);
        assert_eq!(log.recent(9).count(), 4);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let mut log = EventLog::new(0);
        log.push("a");
        log.push("b");
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_hazard_drains_everyone() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut world = world_with(&[3.0, 3.0, 3.0], &mut rng);
        let mut log = EventLog::new(15);

        // Resonance 5 saturates the die into a hazard
        let event = world_event_system(&mut world, &mut log, &mut rng, "TEST-1", 5.0, 8.0);

        assert_eq!(event.roll.outcome, Outcome::Hazard);
        for (_, vitals) in world.query::<&Vitals>().iter() {
            assert_eq!(vitals.energy, -2.0);
        }
        assert_eq!(
            log.last(),
            Some("The TEST-1 strain shimmers... A STORM hits! Energy drains.")
        );
    }

    #[test]
    fn test_calm_world_changes_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut world = world_with(&[3.0], &mut rng);
        let mut log = EventLog::new(15);

        let event = world_event_system(&mut world, &mut log, &mut rng, "TEST-1", -10.0, 8.0);

        assert_eq!(event.roll.outcome, Outcome::Stasis);
        assert_eq!(event.target, None);
        for (_, vitals) in world.query::<&Vitals>().iter() {
            assert_eq!(vitals.energy, 3.0);
        }
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_treasure_rewards_one_survivor() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut world = world_with(&[10.0, 10.0, 10.0], &mut rng);

        let winner = reward_random_survivor(&mut world, &mut rng).expect("someone alive");

        let mut rewarded = 0;
        for (_, (id, vitals)) in world.query::<(&AgentId, &Vitals)>().iter() {
            if *id == winner {
                assert_eq!(vitals.treasures, 1);
                assert_eq!(vitals.energy, 20.0);
                rewarded += 1;
            } else {
                assert_eq!(vitals.treasures, 0);
            }
        }
        assert_eq!(rewarded, 1);
    }

    #[test]
    fn test_treasure_skips_the_dead() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut world = world_with(&[10.0, 10.0], &mut rng);
        for (_, (id, vitals)) in world.query_mut::<(&AgentId, &mut Vitals)>() {
            if id.0 == 0 {
                vitals.alive = false;
            }
        }

        for _ in 0..10 {
            assert_eq!(reward_random_survivor(&mut world, &mut rng), Some(AgentId(1)));
        }
    }

    #[test]
    fn test_treasure_with_nobody_alive_is_a_no_op() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut world = World::new();
        assert_eq!(reward_random_survivor(&mut world, &mut rng), None);
    }
}
