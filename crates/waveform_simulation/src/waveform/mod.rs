//! Waveform domain - weapon identity and tuning.
//!
//! - WaveformKind (identity, compared by value)
//! - WaveformType (authored tuning: damage curve, projectile, counter table)
//! - WaveformLibrary (resource, read-only at runtime)

pub mod library;
pub mod types;

pub use library::WaveformLibrary;
pub use types::*;
