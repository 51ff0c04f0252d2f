//! Combat tuning and authored configuration loading.
//!
//! Defaults mirror the shipped tuning; a RON document can override both the
//! combat constants and the waveform table:
//!
//! ```ron
//! (
//!     combat: (counter_window: 0.3, counter_cooldown: 2.0),
//!     waveforms: [ /* WaveformType entries */ ],
//! )
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::waveform::{WaveformKind, WaveformLibrary, WaveformType};

/// Global combat constants (injected as a resource, never looked up globally).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Fixed simulation rate
    pub tick_hz: f64,

    /// Outgoing ramp stacks reset after this long without an attack (s)
    pub ramp_reset_window: f32,

    /// Parry window length (s)
    pub counter_window: f32,
    /// Cooldown after a window that countered nothing (s)
    pub counter_cooldown: f32,
    /// Per-waveform counter stack cap (Chromatic Saturation trigger)
    pub counter_max_stacks: u32,

    /// Upper bound of total damage resistance (0.9 = 90%)
    pub max_damage_resistance: f32,

    /// Every projectile self-destructs after this long (s)
    pub projectile_lifetime: f32,
    /// Dead bodies are despawned after this long (s)
    pub death_grace_period: f32,
    /// Duration of the status applied when an immune entity is hit (s)
    pub counter_trigger_duration: f32,

    /// Half-angle of the homing acquisition cone around the aim direction (deg)
    pub homing_acquire_cone: f32,
    /// Half-angle of the cone around velocity a homing target must stay in (deg)
    pub homing_retain_cone: f32,
    /// Chain range used when a counter grants a chain to a non-chaining waveform (m)
    pub default_chain_range: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            ramp_reset_window: 2.0,
            counter_window: 0.3,
            counter_cooldown: 2.0,
            counter_max_stacks: 5,
            max_damage_resistance: 0.9,
            projectile_lifetime: 5.0,
            death_grace_period: 2.0,
            counter_trigger_duration: 1.0,
            homing_acquire_cone: 60.0,
            homing_retain_cone: 90.0,
            default_chain_range: 8.0,
        }
    }
}

/// Root of an authored configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub combat: CombatConfig,
    pub waveforms: Vec<WaveformType>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            waveforms: WaveformLibrary::default().iter().cloned().collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("waveform {0:?} is not defined")]
    MissingWaveform(WaveformKind),

    #[error("waveform {0:?} is defined more than once")]
    DuplicateWaveform(WaveformKind),

    #[error("waveform {kind:?} is invalid: {reason}")]
    Invalid { kind: WaveformKind, reason: String },
}

impl SimulationConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = ron::from_str(source)?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Validates the waveform table and splits the document into resources.
    pub fn into_resources(self) -> Result<(CombatConfig, WaveformLibrary), ConfigError> {
        let library = WaveformLibrary::from_waveforms(self.waveforms)?;
        Ok((self.combat, library))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_source_constants() {
        let config = CombatConfig::default();
        assert_eq!(config.ramp_reset_window, 2.0);
        assert_eq!(config.counter_window, 0.3);
        assert_eq!(config.counter_cooldown, 2.0);
        assert_eq!(config.counter_max_stacks, 5);
        assert_eq!(config.max_damage_resistance, 0.9);
    }

    #[test]
    fn test_default_document_roundtrips_through_ron() {
        let source = ron::ser::to_string(&SimulationConfig::default()).expect("serialize");
        let parsed = SimulationConfig::from_ron_str(&source).expect("parse");
        let (combat, library) = parsed.into_resources().expect("valid");

        assert_eq!(combat, CombatConfig::default());
        assert_eq!(library.get(WaveformKind::Square), WaveformLibrary::default().get(WaveformKind::Square));
    }

    #[test]
    fn test_partial_combat_section_uses_defaults() {
        let document = SimulationConfig::default();
        let waveforms = ron::ser::to_string(&document.waveforms).expect("serialize");
        let source = format!("(combat: (counter_window: 0.5), waveforms: {})", waveforms);

        let parsed = SimulationConfig::from_ron_str(&source).expect("parse");
        assert_eq!(parsed.combat.counter_window, 0.5);
        assert_eq!(parsed.combat.counter_cooldown, 2.0);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = SimulationConfig::from_ron_str("(waveforms: [");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimulationConfig::load_from_file("/definitely/not/here.ron");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
