//! Carnival Core - Dark Carnival RNG Ecology Engine
//!
//! A deterministic, tick-based artificial-life simulation. A shared 2D
//! biome evolves continuous resource fields while a population of
//! role-driven entities act, move and expire inside it. Rare world events
//! are decided by the spiral die.
//!
//! # Architecture
//!
//! Entities live in a `hecs` ECS world:
//! - **Components**: Pure data attached to entities (GridPos, Role, Vitals, ConsentKanban, ...)
//! - **Systems**: Logic that runs over components once per tick
//! - **Engine**: Owns the biome, the world, the RNG and the event log
//!
//! # Example
//!
//! ```rust,no_run
//! use carnival_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new(WorldConfig::seeded(42)).unwrap();
//!
//! for _ in 0..100 {
//!     engine.tick();
//! }
//!
//! for line in engine.log().iter() {
//!     println!("{line}");
//! }
//! ```

pub mod biome;
pub mod components;
pub mod config;
pub mod dice;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::biome::{Biome, Field};
    pub use crate::components::*;
    pub use crate::config::WorldConfig;
    pub use crate::dice::{roll_spiral_die, Outcome, Roll};
    pub use crate::engine::{AgentSummary, EngineError, SimulationEngine};
    pub use crate::persistence::{Snapshot, SnapshotError, SnapshotFormat};
    pub use crate::systems::EventLog;
}
