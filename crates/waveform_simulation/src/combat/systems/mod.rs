//! Combat systems (attack, hit resolution, upkeep)

pub mod attack;
pub mod damage;
pub mod resources;


// Re-export all systems
pub use attack::*;
pub use damage::*;
pub use resources::*;
