//! Generation - procedural creation of terrain, population and strain names

mod population;
mod strain;
mod terrain;

pub use population::*;
pub use strain::*;
pub use terrain::*;
