//! Agent components: Role, Vitals, Traits, Genes, Memory

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Behavioral category, chosen once at creation and never changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Normal,
    Mystic,
    Skeptic,
    Fool,
    Pirate,
    Kid,
    Predator,
    Storyteller,
    Chicken,
}

/// Creation probabilities, sampled cumulatively in this order
pub const ROLE_CHANCES: [(Role, f64); 9] = [
    (Role::Normal, 0.6),
    (Role::Mystic, 0.05),
    (Role::Skeptic, 0.1),
    (Role::Fool, 0.05),
    (Role::Pirate, 0.05),
    (Role::Kid, 0.05),
    (Role::Predator, 0.05),
    (Role::Storyteller, 0.03),
    (Role::Chicken, 0.02),
];

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Normal,
        Role::Mystic,
        Role::Skeptic,
        Role::Fool,
        Role::Pirate,
        Role::Kid,
        Role::Predator,
        Role::Storyteller,
        Role::Chicken,
    ];

    /// Weighted draw over [`ROLE_CHANCES`]; residual mass falls back to `Normal`
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::from_roll(rng.gen::<f64>())
    }

    /// Map a uniform sample in [0, 1) onto the role table
    pub fn from_roll(roll: f64) -> Self {
        let mut cumulative = 0.0;
        for (role, chance) in ROLE_CHANCES {
            cumulative += chance;
            if roll < cumulative {
                return role;
            }
        }
        Role::Normal
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Normal => "NORMAL",
            Role::Mystic => "MYSTIC",
            Role::Skeptic => "SKEPTIC",
            Role::Fool => "FOOL",
            Role::Pirate => "PIRATE",
            Role::Kid => "KID",
            Role::Predator => "PREDATOR",
            Role::Storyteller => "STORYTELLER",
            Role::Chicken => "CHICKEN",
        }
    }

    /// Map glyph: first letter of the role name
    pub fn glyph(&self) -> char {
        self.name().chars().next().unwrap_or('?')
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Energy and life state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Unbounded above; the entity dies once this reaches zero
    pub energy: f64,
    /// One-way: true until death, never revived
    pub alive: bool,
    pub treasures: u32,
    /// Visions and predictions seen so far
    pub foresight: u32,
    pub belief: f64,
}

impl Vitals {
    pub fn new(energy: f64) -> Self {
        Self {
            energy,
            alive: true,
            treasures: 0,
            foresight: 0,
            belief: 0.0,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.energy <= 0.0
    }
}

/// Personality traits, roughly 0.0 to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub bravery: f64,
    pub curiosity: f64,
}

impl Traits {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            bravery: rng.gen_range(0.3..0.7),
            curiosity: rng.gen_range(0.3..0.7),
        }
    }
}

/// Heritable dispositions. Not part of the snapshot; re-drawn on restore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Genes {
    pub aggression: f64,
    pub curiosity: f64,
    pub social: f64,
    pub religiosity: f64,
}

impl Genes {
    /// Random genes; the curiosity gene mirrors the creation-time trait
    pub fn random(rng: &mut impl Rng, curiosity: f64) -> Self {
        Self {
            aggression: rng.gen(),
            curiosity,
            social: rng.gen(),
            religiosity: rng.gen(),
        }
    }
}

/// Capacity of the short-term memory ring
pub const SHORT_TERM_CAPACITY: usize = 5;

/// Notable things that happened to an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Most recent events, oldest dropped first
    pub short_term: VecDeque<String>,
    pub long_term: Vec<String>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, event: impl Into<String>) {
        let event = event.into();
        if self.short_term.len() == SHORT_TERM_CAPACITY {
            self.short_term.pop_front();
        }
        self.short_term.push_back(event.clone());
        self.long_term.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_role_chances_sum_to_one() {
        let total: f64 = ROLE_CHANCES.iter().map(|(_, c)| c).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_role_from_roll_buckets() {
        assert_eq!(Role::from_roll(0.0), Role::Normal);
        assert_eq!(Role::from_roll(0.59), Role::Normal);
        assert_eq!(Role::from_roll(0.61), Role::Mystic);
        assert_eq!(Role::from_roll(0.70), Role::Skeptic);
        assert_eq!(Role::from_roll(0.97), Role::Storyteller);
        assert_eq!(Role::from_roll(0.99), Role::Chicken);
        // Residual mass past the table
        assert_eq!(Role::from_roll(1.5), Role::Normal);
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(Role::Pirate.glyph(), 'P');
        assert_eq!(Role::Predator.glyph(), 'P');
        assert_eq!(Role::Kid.glyph(), 'K');
    }

    #[test]
    fn test_traits_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let t = Traits::random(&mut rng);
            assert!((0.3..0.7).contains(&t.bravery));
            assert!((0.3..0.7).contains(&t.curiosity));
        }
    }

    #[test]
    fn test_short_term_memory_is_bounded() {
        let mut memory = Memory::new();
        for i in 0..8 {
            memory.remember(format!("event {i}"));
        }
        assert_eq!(memory.short_term.len(), SHORT_TERM_CAPACITY);
        assert_eq!(memory.short_term.front().map(String::as_str), Some("event 3"));
        assert_eq!(memory.long_term.len(), 8);
    }

    #[test]
    fn test_vitals_spent_at_zero() {
        let mut vitals = Vitals::new(0.5);
        assert!(!vitals.is_spent());
        vitals.energy = 0.0;
        assert!(vitals.is_spent());
    }
}
