//! Tests for CounterSystem state machine and effect table.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::config::CombatConfig;
    use crate::counter::{CounterPhase, CounterPhaseChange, CounterSystem};
    use crate::waveform::{CounterEffect, WaveformKind, WaveformLibrary};

    fn defender() -> Entity {
        Entity::from_raw(1)
    }

    fn attacker() -> Entity {
        Entity::from_raw(2)
    }

    fn effect_of(kind: WaveformKind) -> CounterEffect {
        WaveformLibrary::default().get(kind).expect("authored").counter
    }

    fn open_counter() -> CounterSystem {
        let mut counter = CounterSystem::from_config(&CombatConfig::default());
        assert!(counter.try_open_window());
        counter
    }

    /// Counters `kind` `times` times inside one window.
    fn counter_n(counter: &mut CounterSystem, kind: WaveformKind, times: u32) {
        let effect = effect_of(kind);
        for _ in 0..times {
            assert!(counter.can_counter(kind, Some(kind), attacker(), defender()));
            counter.resolve_counter(kind, &effect);
        }
    }

    #[test]
    fn test_window_opens_only_from_idle() {
        let mut counter = open_counter();
        assert!(counter.is_window_open());
        assert!(!counter.try_open_window());
    }

    #[test]
    fn test_missed_window_starts_cooldown() {
        let mut counter = open_counter();

        let tick = counter.tick(0.31);
        assert_eq!(
            tick.phase_change,
            Some(CounterPhaseChange::WindowEnded {
                successes: 0,
                cooldown_started: true
            })
        );
        assert!(counter.is_on_cooldown());
        assert!(!counter.try_open_window());

        counter.tick(1.0);
        assert!(counter.is_on_cooldown());
        let tick = counter.tick(1.01);
        assert_eq!(tick.phase_change, Some(CounterPhaseChange::CooldownFinished));
        assert_eq!(counter.phase, CounterPhase::Idle);
        assert!(counter.try_open_window());
    }

    #[test]
    fn test_successful_counter_never_starts_cooldown() {
        let mut counter = open_counter();
        counter_n(&mut counter, WaveformKind::Sine, 1);

        // окно не закрывается после успеха
        assert!(counter.is_window_open());

        let tick = counter.tick(0.31);
        assert_eq!(
            tick.phase_change,
            Some(CounterPhaseChange::WindowEnded {
                successes: 1,
                cooldown_started: false
            })
        );
        assert_eq!(counter.phase, CounterPhase::Idle);
        assert!(counter.try_open_window());
    }

    #[test]
    fn test_multiple_counters_per_window() {
        let mut counter = open_counter();
        counter_n(&mut counter, WaveformKind::Square, 3);
        assert_eq!(counter.stacks(WaveformKind::Square), 3);
        assert_eq!(
            counter.phase,
            CounterPhase::WindowOpen {
                remaining: 0.3,
                successes: 3
            }
        );
    }

    #[test]
    fn test_counter_preconditions() {
        let mut counter = CounterSystem::default();
        let kind = WaveformKind::Sine;

        // window closed
        assert!(!counter.can_counter(kind, Some(kind), attacker(), defender()));

        counter.try_open_window();
        assert!(counter.can_counter(kind, Some(kind), attacker(), defender()));
        // waveform mismatch
        assert!(!counter.can_counter(kind, Some(WaveformKind::Square), attacker(), defender()));
        // nothing equipped
        assert!(!counter.can_counter(kind, None, attacker(), defender()));
        // own attack
        assert!(!counter.can_counter(kind, Some(kind), defender(), defender()));
    }

    #[test]
    fn test_switching_waveform_clears_other_track() {
        let mut counter = open_counter();
        counter_n(&mut counter, WaveformKind::Square, 2);
        assert!(counter.damage_resistance() > 0.0);

        let effect = effect_of(WaveformKind::Sawtooth);
        let resolution = counter.resolve_counter(WaveformKind::Sawtooth, &effect);

        assert!(resolution.track_switched);
        assert_eq!(counter.stacks(WaveformKind::Square), 0);
        assert_eq!(counter.stacks(WaveformKind::Sawtooth), 1);
        assert_eq!(counter.damage_resistance(), 0.0);
        assert_eq!(counter.active_track(), Some(WaveformKind::Sawtooth));
    }

    #[test]
    fn test_switching_track_drops_pending_chain_grant() {
        let mut counter = open_counter();
        counter_n(&mut counter, WaveformKind::Sawtooth, 5);
        assert!(counter.buffs.chain_ready);

        counter_n(&mut counter, WaveformKind::Sine, 1);
        assert!(!counter.buffs.chain_ready);
        assert!(!counter.take_chain_ready());
    }

    #[test]
    fn test_bulwark_saturation_clamps_and_reflects() {
        let mut counter = open_counter();
        let effect = CounterEffect::Bulwark {
            resistance_base: 0.5,
            resistance_per_stack: 0.2,
            duration: 4.0,
            reflect_duration: 3.0,
        };

        let mut last = None;
        for _ in 0..5 {
            last = Some(counter.resolve_counter(WaveformKind::Square, &effect));
        }
        let last = last.expect("resolved");

        assert!(last.saturated);
        assert_eq!(last.stacks, 5);
        assert!(counter.damage_resistance() <= 0.9);
        assert!((counter.damage_resistance() - 0.9).abs() < 1e-6);
        assert!(counter.is_reflecting());
        // стек сброшен в той же операции
        assert_eq!(counter.stacks(WaveformKind::Square), 0);
    }

    #[test]
    fn test_restoration_heal_scales_with_stacks() {
        let mut counter = open_counter();
        let effect = effect_of(WaveformKind::Sine);

        assert_eq!(counter.resolve_counter(WaveformKind::Sine, &effect).heal, 10.0);
        assert_eq!(counter.resolve_counter(WaveformKind::Sine, &effect).heal, 15.0);
    }

    #[test]
    fn test_restoration_saturation_regenerates() {
        let mut counter = open_counter();
        counter_n(&mut counter, WaveformKind::Sine, 5);
        assert!(counter.buffs.regeneration.is_some());

        let tick = counter.tick(1.0);
        assert!((tick.regen_heal - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_onslaught_penalty_tracks_stack_state() {
        let mut counter = open_counter();
        counter_n(&mut counter, WaveformKind::Sawtooth, 2);

        assert!((counter.damage_received_multiplier() - 1.3).abs() < 1e-6);
        // next-hit multiplier одноразовый
        assert!((counter.take_next_hit_multiplier() - 1.75).abs() < 1e-6);
        assert_eq!(counter.take_next_hit_multiplier(), 1.0);

        counter_n(&mut counter, WaveformKind::Sawtooth, 3);
        assert_eq!(counter.stacks(WaveformKind::Sawtooth), 0);
        assert_eq!(counter.damage_received_multiplier(), 1.0);
        assert!(counter.take_chain_ready());
        assert!(!counter.take_chain_ready());
    }

    #[test]
    fn test_flux_buffs_expire_to_neutral() {
        let mut counter = open_counter();
        counter_n(&mut counter, WaveformKind::Triangle, 5);

        assert!(counter.has_unlimited_energy());
        assert!((counter.movement_speed_multiplier() - 1.3).abs() < 1e-6);
        assert!((counter.energy_regen_multiplier() - 2.5).abs() < 1e-6);

        counter.tick(4.5);
        assert!(!counter.has_unlimited_energy());
        assert_eq!(counter.movement_speed_multiplier(), 1.0);
        assert!(counter.energy_regen_multiplier() > 1.0);

        counter.tick(1.0);
        assert_eq!(counter.energy_regen_multiplier(), 1.0);
    }

    #[test]
    fn test_window_and_cooldown_last_whole_ticks() {
        let mut counter = open_counter();
        let delta = 1.0 / 60.0;

        // 0.3s = ровно 18 тиков при 60Hz
        for _ in 0..17 {
            assert_eq!(counter.tick(delta).phase_change, None);
        }
        assert_eq!(
            counter.tick(delta).phase_change,
            Some(CounterPhaseChange::WindowEnded {
                successes: 0,
                cooldown_started: true
            })
        );

        // 2.0s = ровно 120 тиков
        for _ in 0..119 {
            assert_eq!(counter.tick(delta).phase_change, None);
        }
        assert_eq!(
            counter.tick(delta).phase_change,
            Some(CounterPhaseChange::CooldownFinished)
        );
    }

    #[test]
    fn test_cancel_window_releases_immediately() {
        let mut counter = open_counter();
        counter_n(&mut counter, WaveformKind::Sine, 1);

        assert_eq!(counter.cancel_window(), Some(1));
        assert_eq!(counter.phase, CounterPhase::Idle);
        assert_eq!(counter.cancel_window(), None);
    }
}
