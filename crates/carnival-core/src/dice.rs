//! Spiral die - procedural magnitude roll behind every world event
//!
//! Three uniform samples form a point in a cube of side `scale`. Its distance
//! from the centre, normalised by the distance to a corner and nudged by the
//! global resonance, becomes the magnitude that picks the outcome.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resonance contribution per unit of global resonance
const RESONANCE_WEIGHT: f64 = 0.2;

/// Categorical result of a roll, bucketed by magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// [0, 0.3)
    Stasis,
    /// [0.3, 0.6)
    Discovery,
    /// [0.6, 0.85)
    Treasure,
    /// [0.85, 1.0]
    Hazard,
}

impl Outcome {
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude < 0.3 {
            Outcome::Stasis
        } else if magnitude < 0.6 {
            Outcome::Discovery
        } else if magnitude < 0.85 {
            Outcome::Treasure
        } else {
            Outcome::Hazard
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Stasis => "STASIS",
            Outcome::Discovery => "DISCOVERY",
            Outcome::Treasure => "TREASURE",
            Outcome::Hazard => "HAZARD",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single spiral die result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Roll {
    /// Always within [0, 1]
    pub magnitude: f64,
    pub outcome: Outcome,
    pub scale: f64,
}

/// Roll the die. Consumes exactly three uniform draws when `scale > 0`;
/// a degenerate die never leaves the centre and draws nothing.
pub fn roll_spiral_die(rng: &mut impl Rng, scale: f64, resonance: f64) -> Roll {
    let half = scale / 2.0;

    let distance_ratio = if half > 0.0 {
        let x = rng.gen_range(-half..=half);
        let y = rng.gen_range(-half..=half);
        let z = rng.gen_range(-half..=half);
        let distance = (x * x + y * y + z * z).sqrt();
        let max_distance = (3.0 * half * half).sqrt();
        distance / max_distance
    } else {
        0.0
    };

    let magnitude = (distance_ratio + resonance * RESONANCE_WEIGHT).clamp(0.0, 1.0);

    Roll {
        magnitude,
        outcome: Outcome::from_magnitude(magnitude),
        scale,
    }
}
