//! Waveform weapon definitions (authored data, never mutated at runtime).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Identity of a waveform.
///
/// Entities and projectiles reference waveforms by kind; the tuning lives in
/// `WaveformLibrary`. Two attacks "match" for counters when their kinds are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub enum WaveformKind {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl WaveformKind {
    pub const ALL: [WaveformKind; 4] = [
        WaveformKind::Sine,
        WaveformKind::Square,
        WaveformKind::Sawtooth,
        WaveformKind::Triangle,
    ];

    /// Stable slot index (0..4), used by per-waveform arrays.
    pub fn index(self) -> usize {
        match self {
            WaveformKind::Sine => 0,
            WaveformKind::Square => 1,
            WaveformKind::Sawtooth => 2,
            WaveformKind::Triangle => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WaveformKind::Sine => "Sine",
            WaveformKind::Square => "Square",
            WaveformKind::Sawtooth => "Sawtooth",
            WaveformKind::Triangle => "Triangle",
        }
    }
}

/// Full tuning of one waveform weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformType {
    pub kind: WaveformKind,

    /// Base damage per attack (before ramp and buffs)
    pub base_damage: f32,

    /// Energy spent per attack (before ramp surcharge)
    pub energy_cost: f32,

    /// Fixed health cost paid instead of energy when energy is short.
    /// `None` = attack simply fails without energy.
    #[serde(default)]
    pub health_fallback_cost: Option<f32>,

    /// Seconds between attacks
    #[serde(default)]
    pub attack_cooldown: f32,

    /// Outgoing damage ramp (consecutive attacks)
    #[serde(default)]
    pub ramp: Option<RampConfig>,

    /// Incoming damage ramp (consecutive hits received from one source)
    #[serde(default)]
    pub hit_ramp: Option<HitRampConfig>,

    /// Traveling body settings (ignored for hitscan waveforms)
    pub projectile: ProjectileConfig,

    #[serde(default)]
    pub homing: Option<HomingConfig>,

    #[serde(default)]
    pub chain: Option<ChainConfig>,

    #[serde(default)]
    pub hitscan: Option<HitscanConfig>,

    /// Impulse magnitude applied to the target on a landed hit (0 = none)
    #[serde(default)]
    pub knockback_force: f32,

    /// What a successful counter of this waveform grants the defender
    pub counter: CounterEffect,
}

impl WaveformType {
    pub fn is_hitscan(&self) -> bool {
        self.hitscan.is_some()
    }
}

/// Outgoing ramp: damage grows with consecutive attacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampConfig {
    /// Stack cap
    pub max_stacks: u32,
    /// Damage multiplier at `max_stacks` (linear between 1.0 and this)
    pub max_multiplier: f32,
    /// Energy cost factor per current stack: `cost × (1 + surcharge × stacks)`
    pub energy_surcharge_per_stack: f32,
}

/// Incoming ramp: damage taken grows with consecutive hits of the same
/// waveform from the same source inside `timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRampConfig {
    /// Extra damage fraction per previous consecutive hit (0.15 = +15%)
    pub bonus_per_hit: f32,
    /// Cap on counted consecutive hits
    pub max_hits: u32,
    /// Seconds without a hit before the count resets
    pub timeout: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    /// m/s
    pub speed: f32,
    /// Collision sphere radius (m)
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomingConfig {
    /// Max steer rate (degrees per second)
    pub strength: f32,
    /// Acquisition and retention range (m)
    pub range: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Search radius around the hit point (m)
    pub range: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitscanConfig {
    /// Max ray distance (m)
    pub range: f32,
}

/// Counter effect table of a waveform.
///
/// Normal effect scales with the stack count `n` as `base + per_stack × (n − 1)`;
/// the at-cap ("Chromatic Saturation") bonus fires once when `n` reaches the cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CounterEffect {
    /// Instant heal; at cap a regeneration aura
    Restoration {
        heal_base: f32,
        heal_per_stack: f32,
        regen_per_second: f32,
        regen_duration: f32,
    },
    /// Timed damage resistance; at cap reflection of incoming attacks
    Bulwark {
        resistance_base: f32,
        resistance_per_stack: f32,
        duration: f32,
        reflect_duration: f32,
    },
    /// Next outgoing attack multiplier; at cap a one-shot chain attack.
    /// While stacks are held the defender takes `received_penalty`× damage.
    Onslaught {
        multiplier_base: f32,
        multiplier_per_stack: f32,
        received_penalty: f32,
    },
    /// Timed energy regen multiplier; at cap unlimited energy + speed
    Flux {
        regen_base: f32,
        regen_per_stack: f32,
        duration: f32,
        unlimited_duration: f32,
        speed_multiplier: f32,
    },
}

/// `base + per_stack × (n − 1)` for `n ≥ 1`.
pub fn scaled_by_stacks(base: f32, per_stack: f32, stacks: u32) -> f32 {
    base + per_stack * stacks.saturating_sub(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_indices_are_unique() {
        let mut seen = [false; 4];
        for kind in WaveformKind::ALL {
            assert!(!seen[kind.index()]);
            seen[kind.index()] = true;
        }
    }

    #[test]
    fn test_scaled_by_stacks() {
        assert_eq!(scaled_by_stacks(10.0, 5.0, 1), 10.0);
        assert_eq!(scaled_by_stacks(10.0, 5.0, 3), 20.0);
        // n = 0 не бывает, но не должно уходить в минус
        assert_eq!(scaled_by_stacks(10.0, 5.0, 0), 10.0);
    }
}
