//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! Behavior that spans a tick lives in systems; the only exception is the
//! consent kanban, whose state machine is self-contained.

mod agent;
mod common;
mod social;

pub use agent::*;
pub use common::*;
pub use social::*;
