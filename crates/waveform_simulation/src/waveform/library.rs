//! WaveformLibrary - the authored waveform table as an ECS resource.

use bevy::prelude::*;

use super::types::*;
use crate::config::ConfigError;

/// All authored waveforms, one per `WaveformKind`.
///
/// Passed to systems as `Res<WaveformLibrary>`; the core only ever reads it.
#[derive(Resource, Debug, Clone)]
pub struct WaveformLibrary {
    waveforms: Vec<WaveformType>,
}

impl Default for WaveformLibrary {
    fn default() -> Self {
        Self {
            waveforms: vec![sine(), square(), sawtooth(), triangle()],
        }
    }
}

impl WaveformLibrary {
    /// Builds a library from authored entries; every kind must appear exactly once.
    pub fn from_waveforms(waveforms: Vec<WaveformType>) -> Result<Self, ConfigError> {
        for (i, waveform) in waveforms.iter().enumerate() {
            if waveforms[..i].iter().any(|w| w.kind == waveform.kind) {
                return Err(ConfigError::DuplicateWaveform(waveform.kind));
            }
            validate(waveform)?;
        }

        for kind in WaveformKind::ALL {
            if !waveforms.iter().any(|w| w.kind == kind) {
                return Err(ConfigError::MissingWaveform(kind));
            }
        }

        let mut waveforms = waveforms;
        waveforms.sort_by_key(|w| w.kind.index());
        Ok(Self { waveforms })
    }

    pub fn get(&self, kind: WaveformKind) -> Option<&WaveformType> {
        self.waveforms.iter().find(|w| w.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WaveformType> {
        self.waveforms.iter()
    }
}

fn validate(waveform: &WaveformType) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        kind: waveform.kind,
        reason: reason.to_string(),
    };

    if waveform.base_damage < 0.0 {
        return Err(invalid("base_damage must be >= 0"));
    }
    if waveform.energy_cost < 0.0 {
        return Err(invalid("energy_cost must be >= 0"));
    }
    if waveform.health_fallback_cost.is_some_and(|cost| cost <= 0.0) {
        return Err(invalid("health_fallback_cost must be > 0"));
    }
    if waveform.projectile.speed <= 0.0 || waveform.projectile.radius <= 0.0 {
        return Err(invalid("projectile speed and radius must be > 0"));
    }
    if let Some(ramp) = waveform.ramp {
        if ramp.max_stacks == 0 {
            return Err(invalid("ramp.max_stacks must be > 0"));
        }
        if ramp.max_multiplier < 1.0 {
            return Err(invalid("ramp.max_multiplier must be >= 1"));
        }
    }
    if let Some(hit_ramp) = waveform.hit_ramp {
        if hit_ramp.timeout <= 0.0 {
            return Err(invalid("hit_ramp.timeout must be > 0"));
        }
    }
    if waveform.homing.is_some_and(|h| h.range <= 0.0 || h.strength < 0.0) {
        return Err(invalid("homing range must be > 0 and strength >= 0"));
    }
    if waveform.hitscan.is_some_and(|h| h.range <= 0.0) {
        return Err(invalid("hitscan.range must be > 0"));
    }

    Ok(())
}

// ============================================================================
// Shipped tuning
// ============================================================================

/// Sine - sustained homing stream, heals on counter.
fn sine() -> WaveformType {
    WaveformType {
        kind: WaveformKind::Sine,
        base_damage: 12.0,
        energy_cost: 8.0,
        health_fallback_cost: None,
        attack_cooldown: 0.25,
        ramp: None,
        hit_ramp: None,
        projectile: ProjectileConfig { speed: 25.0, radius: 0.2 },
        homing: Some(HomingConfig { strength: 180.0, range: 20.0 }),
        chain: None,
        hitscan: None,
        knockback_force: 0.0,
        counter: CounterEffect::Restoration {
            heal_base: 10.0,
            heal_per_stack: 5.0,
            regen_per_second: 5.0,
            regen_duration: 5.0,
        },
    }
}

/// Square - heavy hitscan pulse, stacking hits hurt more, resistance on counter.
fn square() -> WaveformType {
    WaveformType {
        kind: WaveformKind::Square,
        base_damage: 20.0,
        energy_cost: 15.0,
        health_fallback_cost: Some(10.0),
        attack_cooldown: 0.6,
        ramp: None,
        hit_ramp: Some(HitRampConfig {
            bonus_per_hit: 0.15,
            max_hits: 5,
            timeout: 1.5,
        }),
        projectile: ProjectileConfig { speed: 30.0, radius: 0.25 },
        homing: None,
        chain: None,
        hitscan: Some(HitscanConfig { range: 40.0 }),
        knockback_force: 6.0,
        counter: CounterEffect::Bulwark {
            resistance_base: 0.2,
            resistance_per_stack: 0.1,
            duration: 4.0,
            reflect_duration: 3.0,
        },
    }
}

/// Sawtooth - fast ramping chain shots, damage bonus on counter.
fn sawtooth() -> WaveformType {
    WaveformType {
        kind: WaveformKind::Sawtooth,
        base_damage: 8.0,
        energy_cost: 5.0,
        health_fallback_cost: None,
        attack_cooldown: 0.15,
        ramp: Some(RampConfig {
            max_stacks: 5,
            max_multiplier: 2.5,
            energy_surcharge_per_stack: 0.5,
        }),
        hit_ramp: None,
        projectile: ProjectileConfig { speed: 35.0, radius: 0.15 },
        homing: None,
        chain: Some(ChainConfig { range: 8.0 }),
        hitscan: None,
        knockback_force: 2.0,
        counter: CounterEffect::Onslaught {
            multiplier_base: 1.5,
            multiplier_per_stack: 0.25,
            received_penalty: 1.3,
        },
    }
}

/// Triangle - mid-range seeker, energy regen on counter.
fn triangle() -> WaveformType {
    WaveformType {
        kind: WaveformKind::Triangle,
        base_damage: 15.0,
        energy_cost: 10.0,
        health_fallback_cost: Some(5.0),
        attack_cooldown: 0.4,
        ramp: None,
        hit_ramp: None,
        projectile: ProjectileConfig { speed: 20.0, radius: 0.3 },
        homing: Some(HomingConfig { strength: 120.0, range: 25.0 }),
        chain: None,
        hitscan: None,
        knockback_force: 3.0,
        counter: CounterEffect::Flux {
            regen_base: 1.5,
            regen_per_stack: 0.25,
            duration: 5.0,
            unlimited_duration: 4.0,
            speed_multiplier: 1.3,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_library_has_every_kind() {
        let library = WaveformLibrary::default();
        for kind in WaveformKind::ALL {
            let waveform = library.get(kind).expect("kind present");
            assert_eq!(waveform.kind, kind);
        }
    }

    #[test]
    fn test_default_library_is_valid() {
        let waveforms: Vec<_> = WaveformLibrary::default().iter().cloned().collect();
        assert!(WaveformLibrary::from_waveforms(waveforms).is_ok());
    }

    #[test]
    fn test_missing_kind_rejected() {
        let waveforms = vec![sine(), square(), sawtooth()];
        let result = WaveformLibrary::from_waveforms(waveforms);
        assert!(matches!(result, Err(ConfigError::MissingWaveform(WaveformKind::Triangle))));
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let waveforms = vec![sine(), sine(), square(), sawtooth(), triangle()];
        let result = WaveformLibrary::from_waveforms(waveforms);
        assert!(matches!(result, Err(ConfigError::DuplicateWaveform(WaveformKind::Sine))));
    }

    #[test]
    fn test_invalid_ramp_rejected() {
        let mut broken = sawtooth();
        broken.ramp = Some(RampConfig {
            max_stacks: 0,
            max_multiplier: 2.0,
            energy_surcharge_per_stack: 0.5,
        });
        let result = WaveformLibrary::from_waveforms(vec![sine(), square(), broken, triangle()]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { kind: WaveformKind::Sawtooth, .. })
        ));
    }

    #[test]
    fn test_order_does_not_matter() {
        let library =
            WaveformLibrary::from_waveforms(vec![triangle(), sawtooth(), square(), sine()]).expect("valid");
        let kinds: Vec<_> = library.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, WaveformKind::ALL.to_vec());
    }
}
