//! Systems - logic that runs over components once per tick

mod agents;
mod events;
mod movement;
mod roles;

pub use agents::*;
pub use events::*;
pub use movement::*;
pub use roles::*;
