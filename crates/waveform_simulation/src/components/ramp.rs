//! Damage ramp bookkeeping.
//!
//! Two independent mechanisms:
//! - `RampStacks` - outgoing: consecutive attacks with a waveform hit harder,
//!   stacks drop to 0 after a fixed idle window.
//! - `HitRampTracker` - incoming: consecutive hits of one waveform from one
//!   source hurt more, reset after the waveform's own timeout.

use bevy::prelude::*;

use crate::waveform::{HitRampConfig, WaveformKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct RampSlot {
    pub stacks: u32,
    /// Seconds until stacks reset
    pub timer: f32,
}

/// Outgoing ramp state, one slot per waveform.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct RampStacks {
    slots: [RampSlot; 4],
}

impl RampStacks {
    pub fn stacks(&self, kind: WaveformKind) -> u32 {
        self.slots[kind.index()].stacks
    }

    pub fn slot(&self, kind: WaveformKind) -> &RampSlot {
        &self.slots[kind.index()]
    }

    /// One more attack: stack +1 (capped), decay timer restarts.
    pub fn register_attack(&mut self, kind: WaveformKind, max_stacks: u32, reset_window: f32) {
        let slot = &mut self.slots[kind.index()];
        slot.stacks = (slot.stacks + 1).min(max_stacks);
        slot.timer = reset_window;
    }

    /// Advances decay timers; returns waveforms whose stacks just reset.
    pub fn tick(&mut self, delta: f32) -> Vec<WaveformKind> {
        let mut reset = Vec::new();
        for kind in WaveformKind::ALL {
            let slot = &mut self.slots[kind.index()];
            if slot.stacks == 0 {
                continue;
            }
            slot.timer -= delta;
            if slot.timer <= 0.0 {
                slot.stacks = 0;
                slot.timer = 0.0;
                reset.push(kind);
            }
        }
        reset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct HitRampEntry {
    pub source: Entity,
    pub kind: WaveformKind,
    pub consecutive_hits: u32,
    /// Simulation time of the last hit (s)
    pub last_hit: f32,
    pub timeout: f32,
}

/// Incoming ramp state, keyed by (source, waveform).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct HitRampTracker {
    entries: Vec<HitRampEntry>,
}

impl HitRampTracker {
    /// Registers a hit and returns the damage multiplier it should get.
    ///
    /// The multiplier counts hits *before* this one: the first hit is ×1.0.
    pub fn register_hit(&mut self, source: Entity, kind: WaveformKind, now: f32, config: &HitRampConfig) -> f32 {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.source == source && e.kind == kind);

        let previous = match entry {
            Some(entry) => {
                let previous = if now - entry.last_hit <= config.timeout {
                    entry.consecutive_hits.min(config.max_hits)
                } else {
                    0
                };
                entry.consecutive_hits = (previous + 1).min(config.max_hits.max(1));
                entry.last_hit = now;
                entry.timeout = config.timeout;
                previous
            }
            None => {
                self.entries.push(HitRampEntry {
                    source,
                    kind,
                    consecutive_hits: 1,
                    last_hit: now,
                    timeout: config.timeout,
                });
                0
            }
        };

        1.0 + config.bonus_per_hit * previous as f32
    }

    pub fn consecutive_hits(&self, source: Entity, kind: WaveformKind) -> u32 {
        self.entries
            .iter()
            .find(|e| e.source == source && e.kind == kind)
            .map_or(0, |e| e.consecutive_hits)
    }

    /// Drops entries whose timeout elapsed.
    pub fn prune(&mut self, now: f32) {
        self.entries.retain(|e| now - e.last_hit <= e.timeout);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESET: f32 = 2.0;

    #[test]
    fn test_stacks_capped_at_max() {
        let mut ramp = RampStacks::default();
        for _ in 0..10 {
            ramp.register_attack(WaveformKind::Sawtooth, 5, RESET);
        }
        assert_eq!(ramp.stacks(WaveformKind::Sawtooth), 5);
        assert_eq!(ramp.stacks(WaveformKind::Sine), 0);
    }

    #[test]
    fn test_stacks_reset_exactly_when_window_lapses() {
        let mut ramp = RampStacks::default();
        ramp.register_attack(WaveformKind::Sawtooth, 5, RESET);
        ramp.register_attack(WaveformKind::Sawtooth, 5, RESET);

        assert!(ramp.tick(1.5).is_empty());
        assert_eq!(ramp.stacks(WaveformKind::Sawtooth), 2);

        let reset = ramp.tick(0.5);
        assert_eq!(reset, vec![WaveformKind::Sawtooth]);
        assert_eq!(ramp.stacks(WaveformKind::Sawtooth), 0);
    }

    #[test]
    fn test_attack_restarts_decay_timer() {
        let mut ramp = RampStacks::default();
        ramp.register_attack(WaveformKind::Sawtooth, 5, RESET);
        ramp.tick(1.5);
        ramp.register_attack(WaveformKind::Sawtooth, 5, RESET);
        ramp.tick(1.5);

        assert_eq!(ramp.stacks(WaveformKind::Sawtooth), 2);
    }

    fn hit_ramp() -> HitRampConfig {
        HitRampConfig {
            bonus_per_hit: 0.15,
            max_hits: 3,
            timeout: 1.5,
        }
    }

    #[test]
    fn test_consecutive_hits_ramp_up() {
        let mut tracker = HitRampTracker::default();
        let source = Entity::from_raw(7);
        let config = hit_ramp();

        assert_eq!(tracker.register_hit(source, WaveformKind::Square, 0.0, &config), 1.0);
        assert!((tracker.register_hit(source, WaveformKind::Square, 0.5, &config) - 1.15).abs() < 1e-5);
        assert!((tracker.register_hit(source, WaveformKind::Square, 1.0, &config) - 1.30).abs() < 1e-5);
        // cap = 3 previous hits
        assert!((tracker.register_hit(source, WaveformKind::Square, 1.5, &config) - 1.45).abs() < 1e-5);
        assert!((tracker.register_hit(source, WaveformKind::Square, 2.0, &config) - 1.45).abs() < 1e-5);
    }

    #[test]
    fn test_timeout_resets_count() {
        let mut tracker = HitRampTracker::default();
        let source = Entity::from_raw(7);
        let config = hit_ramp();

        tracker.register_hit(source, WaveformKind::Square, 0.0, &config);
        tracker.register_hit(source, WaveformKind::Square, 0.5, &config);
        assert_eq!(tracker.register_hit(source, WaveformKind::Square, 5.0, &config), 1.0);
        assert_eq!(tracker.consecutive_hits(source, WaveformKind::Square), 1);
    }

    #[test]
    fn test_sources_tracked_separately() {
        let mut tracker = HitRampTracker::default();
        let config = hit_ramp();

        tracker.register_hit(Entity::from_raw(1), WaveformKind::Square, 0.0, &config);
        let other = tracker.register_hit(Entity::from_raw(2), WaveformKind::Square, 0.1, &config);
        assert_eq!(other, 1.0);
    }

    #[test]
    fn test_prune_drops_stale_entries() {
        let mut tracker = HitRampTracker::default();
        tracker.register_hit(Entity::from_raw(1), WaveformKind::Square, 0.0, &hit_ramp());
        tracker.prune(1.0);
        assert!(!tracker.is_empty());
        tracker.prune(2.0);
        assert!(tracker.is_empty());
    }
}
