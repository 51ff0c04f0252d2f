//! Counter / parry engine
//!
//! Игрок открывает короткое окно; атаки с тем же waveform, что у него в руках,
//! уничтожаются и превращаются в нарастающие баффы этого waveform.
//! Стек на капе → Chromatic Saturation (одноразовый бонус, стек в 0).
//!
//! Only one waveform's buff track lives at a time: countering a different
//! waveform wipes the other stacks and buffs first.

pub mod components;
pub mod effects;
pub mod events;
pub mod systems;

#[cfg(test)]
mod components_tests;

pub use components::*;
pub use effects::apply_counter_effect;
pub use events::{CounterEvent, CounterIntent};
