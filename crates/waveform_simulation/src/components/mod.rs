//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (faction, health, energy, equipped waveform, immunities)
//! - status: таймерные модификаторы (StatusEffects)
//! - ramp: outgoing рамп-стеки и incoming ramp-on-hit

pub mod actor;
pub mod ramp;
pub mod status;

// Re-exports для удобного импорта
pub use actor::*;
pub use ramp::*;
pub use status::*;
