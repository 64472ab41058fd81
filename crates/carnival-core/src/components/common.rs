//! Common components used by every entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an entity within a world lineage.
///
/// Ordering by id is the population order: ids are handed out in creation
/// order and survive a snapshot round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer grid position, always inside the biome bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, x: usize, y: usize) -> usize {
        self.x.abs_diff(x) + self.y.abs_diff(y)
    }

    /// Neighbouring cell in `dir`, or None if it falls outside a `width` x `height` grid
    pub fn step(&self, dir: Direction, width: usize, height: usize) -> Option<Self> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        (x < width && y < height).then_some(Self { x, y })
    }
}

/// Axis-aligned unit step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

/// Movement mode. Every stance except `Dormant` random-walks one cell per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    #[default]
    Dormant,
    Seek,
    Social,
    Holy,
    Drill,
    Flee,
}

impl Stance {
    pub fn is_mobile(&self) -> bool {
        !matches!(self, Stance::Dormant)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stance::Dormant => "DORMANT",
            Stance::Seek => "SEEK",
            Stance::Social => "SOCIAL",
            Stance::Holy => "HOLY",
            Stance::Drill => "DRILL",
            Stance::Flee => "FLEE",
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
