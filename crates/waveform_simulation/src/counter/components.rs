//! Counter (parry) state component.
//!
//! State machine:
//! ```text
//! Idle ──open──▶ WindowOpen ──expire, 0 counters──▶ Cooldown ──expire──▶ Idle
//!                    │
//!                    └──expire, ≥1 counter──▶ Idle (no cooldown)
//! ```
//! A successful counter never closes the window: several attacks can be
//! countered during one activation.

use bevy::prelude::*;

use super::effects::apply_counter_effect;
use crate::config::CombatConfig;
use crate::waveform::{CounterEffect, WaveformKind};

/// Остаток таймера окна/cooldown ниже этого порога считается нулём:
/// накопленная ошибка `f32` не должна давать окну лишний тик.
const TIMER_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum CounterPhase {
    Idle,
    WindowOpen { remaining: f32, successes: u32 },
    Cooldown { remaining: f32 },
}

/// A buff value with its own expiry timer.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TimedBuff {
    pub value: f32,
    /// seconds
    pub remaining: f32,
}

impl TimedBuff {
    pub fn new(value: f32, duration: f32) -> Self {
        Self {
            value,
            remaining: duration,
        }
    }
}

/// Buffs granted by successful counters. Only one waveform's track is live at a time.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct CounterBuffs {
    /// Bulwark: fraction of incoming damage ignored
    pub damage_resistance: Option<TimedBuff>,
    /// Bulwark at cap: incoming attacks bounce back to their source
    pub reflect: Option<TimedBuff>,
    /// Onslaught: multiplier consumed by the next outgoing attack
    pub next_hit_multiplier: Option<f32>,
    /// Onslaught: incoming damage multiplier, live while Onslaught stacks > 0
    pub received_penalty: Option<f32>,
    /// Onslaught at cap: next fired projectile chains once
    pub chain_ready: bool,
    /// Restoration at cap: heal per second
    pub regeneration: Option<TimedBuff>,
    /// Flux: energy regen multiplier
    pub energy_regen: Option<TimedBuff>,
    /// Flux at cap: free attacks; value = movement speed multiplier
    pub unlimited_energy: Option<TimedBuff>,
}

impl CounterBuffs {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Ticks every timed buff; expired ones go back to neutral.
    /// Returns health restored by regeneration this tick.
    fn tick(&mut self, delta: f32) -> f32 {
        let mut regen_heal = 0.0;
        if let Some(regen) = self.regeneration.as_mut() {
            regen_heal = regen.value * delta.min(regen.remaining).max(0.0);
        }

        for slot in [
            &mut self.damage_resistance,
            &mut self.reflect,
            &mut self.regeneration,
            &mut self.energy_regen,
            &mut self.unlimited_energy,
        ] {
            if let Some(buff) = slot.as_mut() {
                buff.remaining -= delta;
                if buff.remaining <= 0.0 {
                    *slot = None;
                }
            }
        }

        regen_heal
    }
}

/// Result of one successful counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterResolution {
    pub waveform: WaveformKind,
    /// Stack count reached by this counter (before a saturation reset)
    pub stacks: u32,
    /// Chromatic Saturation fired (stack counter is back to 0)
    pub saturated: bool,
    /// Previous track belonged to another waveform and was wiped
    pub track_switched: bool,
    /// Instant heal granted (Restoration)
    pub heal: f32,
}

/// Phase transition produced by `CounterSystem::tick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CounterPhaseChange {
    WindowEnded { successes: u32, cooldown_started: bool },
    CooldownFinished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CounterTick {
    pub phase_change: Option<CounterPhaseChange>,
    pub regen_heal: f32,
}

/// Parry engine owned by the player actor.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CounterSystem {
    pub phase: CounterPhase,
    pub window_duration: f32,
    pub cooldown_duration: f32,
    pub max_stacks: u32,
    pub max_resistance: f32,
    stacks: [u32; 4],
    active_track: Option<WaveformKind>,
    pub buffs: CounterBuffs,
}

impl Default for CounterSystem {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default())
    }
}

impl CounterSystem {
    pub fn from_config(config: &CombatConfig) -> Self {
        Self {
            phase: CounterPhase::Idle,
            window_duration: config.counter_window,
            cooldown_duration: config.counter_cooldown,
            max_stacks: config.counter_max_stacks.max(1),
            max_resistance: config.max_damage_resistance,
            stacks: [0; 4],
            active_track: None,
            buffs: CounterBuffs::default(),
        }
    }

    pub fn is_window_open(&self) -> bool {
        matches!(self.phase, CounterPhase::WindowOpen { .. })
    }

    pub fn is_on_cooldown(&self) -> bool {
        matches!(self.phase, CounterPhase::Cooldown { .. })
    }

    pub fn stacks(&self, kind: WaveformKind) -> u32 {
        self.stacks[kind.index()]
    }

    pub fn active_track(&self) -> Option<WaveformKind> {
        self.active_track
    }

    /// Opens the parry window. Only possible from Idle.
    pub fn try_open_window(&mut self) -> bool {
        if self.phase != CounterPhase::Idle {
            return false;
        }
        self.phase = CounterPhase::WindowOpen {
            remaining: self.window_duration,
            successes: 0,
        };
        true
    }

    /// Closes an open window right now (death, interrupt). No cooldown.
    /// Returns the window's success count if one was open.
    pub fn cancel_window(&mut self) -> Option<u32> {
        let CounterPhase::WindowOpen { successes, .. } = self.phase else {
            return None;
        };
        self.phase = CounterPhase::Idle;
        Some(successes)
    }

    /// Counter preconditions: open window, defender's equipped waveform equals
    /// the attack's waveform, and the attack is not the defender's own.
    pub fn can_counter(
        &self,
        attack: WaveformKind,
        defender_equipped: Option<WaveformKind>,
        attacker: Entity,
        defender: Entity,
    ) -> bool {
        self.is_window_open() && defender_equipped == Some(attack) && attacker != defender
    }

    /// Converts an intercepted attack into a buff. Caller checks `can_counter` first.
    pub fn resolve_counter(&mut self, waveform: WaveformKind, effect: &CounterEffect) -> CounterResolution {
        if let CounterPhase::WindowOpen { successes, .. } = &mut self.phase {
            *successes += 1;
        }

        // Другой waveform - старый трек гасится целиком до начисления стека
        let track_switched = self.active_track.is_some_and(|track| track != waveform);
        if self.active_track != Some(waveform) {
            self.buffs.clear();
            for kind in WaveformKind::ALL {
                if kind != waveform {
                    self.stacks[kind.index()] = 0;
                }
            }
            self.active_track = Some(waveform);
        }

        let slot = &mut self.stacks[waveform.index()];
        *slot = (*slot + 1).min(self.max_stacks);
        let stacks = *slot;
        let saturated = stacks >= self.max_stacks;

        let heal = apply_counter_effect(&mut self.buffs, effect, stacks, saturated, self.max_resistance);

        if saturated {
            self.stacks[waveform.index()] = 0;
            // penalty живёт только пока стеки > 0
            self.buffs.received_penalty = None;
        }

        CounterResolution {
            waveform,
            stacks,
            saturated,
            track_switched,
            heal,
        }
    }

    /// Advances window/cooldown timers and buff expiry.
    pub fn tick(&mut self, delta: f32) -> CounterTick {
        let phase_change = match &mut self.phase {
            CounterPhase::Idle => None,
            CounterPhase::WindowOpen { remaining, successes } => {
                *remaining -= delta;
                if *remaining <= TIMER_EPSILON {
                    let successes = *successes;
                    let cooldown_started = successes == 0;
                    self.phase = if cooldown_started {
                        CounterPhase::Cooldown {
                            remaining: self.cooldown_duration,
                        }
                    } else {
                        CounterPhase::Idle
                    };
                    Some(CounterPhaseChange::WindowEnded {
                        successes,
                        cooldown_started,
                    })
                } else {
                    None
                }
            }
            CounterPhase::Cooldown { remaining } => {
                *remaining -= delta;
                if *remaining <= TIMER_EPSILON {
                    self.phase = CounterPhase::Idle;
                    Some(CounterPhaseChange::CooldownFinished)
                } else {
                    None
                }
            }
        };

        let regen_heal = self.buffs.tick(delta);

        CounterTick {
            phase_change,
            regen_heal,
        }
    }

    // === Modifier queries (neutral values when no buff is live) ===

    pub fn damage_resistance(&self) -> f32 {
        self.buffs.damage_resistance.map_or(0.0, |b| b.value)
    }

    pub fn damage_received_multiplier(&self) -> f32 {
        let held = self.active_track.is_some_and(|track| self.stacks(track) > 0);
        match self.buffs.received_penalty {
            Some(penalty) if held => penalty,
            _ => 1.0,
        }
    }

    pub fn is_reflecting(&self) -> bool {
        self.buffs.reflect.is_some()
    }

    pub fn energy_regen_multiplier(&self) -> f32 {
        self.buffs.energy_regen.map_or(1.0, |b| b.value)
    }

    pub fn has_unlimited_energy(&self) -> bool {
        self.buffs.unlimited_energy.is_some()
    }

    pub fn movement_speed_multiplier(&self) -> f32 {
        self.buffs.unlimited_energy.map_or(1.0, |b| b.value)
    }

    /// Consumes the pending next-hit multiplier (1.0 if none).
    pub fn take_next_hit_multiplier(&mut self) -> f32 {
        self.buffs.next_hit_multiplier.take().unwrap_or(1.0)
    }

    /// Consumes the pending chain grant.
    pub fn take_chain_ready(&mut self) -> bool {
        std::mem::take(&mut self.buffs.chain_ready)
    }
}
