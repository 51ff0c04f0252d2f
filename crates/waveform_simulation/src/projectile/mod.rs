//! Targeting / projectile engine
//!
//! Traveling waveform bodies: homing steer, collision resolution, one-level
//! chaining. Hitscan waveforms never spawn a body (see `combat::systems::attack`).
//! Systems are scheduled by `CombatPlugin` between hit resolution and upkeep.

pub mod chain;
pub mod components;
pub mod homing;
pub mod systems;

pub use components::{HomingState, WaveformProjectile};
pub use systems::{advance_projectiles, spawn_projectile, steer_homing_projectiles};
