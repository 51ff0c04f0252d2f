//! Per-waveform counter effect table.
//!
//! | Effect      | Normal (n stacks)                      | At cap                          |
//! |-------------|----------------------------------------|---------------------------------|
//! | Restoration | heal `base + per × (n−1)`              | regeneration aura               |
//! | Bulwark     | resistance `min(base + per × (n−1), max)` | reflect incoming attacks     |
//! | Onslaught   | next attack × `base + per × (n−1)`     | one chain attack                |
//! | Flux        | energy regen × `base + per × (n−1)`    | unlimited energy + move speed   |

use super::components::{CounterBuffs, TimedBuff};
use crate::waveform::{scaled_by_stacks, CounterEffect};

/// Applies the normal effect for `stacks` and, if `saturated`, the at-cap bonus.
/// Returns the instant heal to apply to the defender.
pub fn apply_counter_effect(
    buffs: &mut CounterBuffs,
    effect: &CounterEffect,
    stacks: u32,
    saturated: bool,
    max_resistance: f32,
) -> f32 {
    match *effect {
        CounterEffect::Restoration {
            heal_base,
            heal_per_stack,
            regen_per_second,
            regen_duration,
        } => {
            if saturated {
                buffs.regeneration = Some(TimedBuff::new(regen_per_second, regen_duration));
            }
            scaled_by_stacks(heal_base, heal_per_stack, stacks).max(0.0)
        }

        CounterEffect::Bulwark {
            resistance_base,
            resistance_per_stack,
            duration,
            reflect_duration,
        } => {
            let resistance = scaled_by_stacks(resistance_base, resistance_per_stack, stacks)
                .clamp(0.0, max_resistance);
            buffs.damage_resistance = Some(TimedBuff::new(resistance, duration));
            if saturated {
                buffs.reflect = Some(TimedBuff::new(1.0, reflect_duration));
            }
            0.0
        }

        CounterEffect::Onslaught {
            multiplier_base,
            multiplier_per_stack,
            received_penalty,
        } => {
            buffs.next_hit_multiplier = Some(scaled_by_stacks(multiplier_base, multiplier_per_stack, stacks));
            buffs.received_penalty = Some(received_penalty);
            if saturated {
                buffs.chain_ready = true;
            }
            0.0
        }

        CounterEffect::Flux {
            regen_base,
            regen_per_stack,
            duration,
            unlimited_duration,
            speed_multiplier,
        } => {
            buffs.energy_regen = Some(TimedBuff::new(
                scaled_by_stacks(regen_base, regen_per_stack, stacks),
                duration,
            ));
            if saturated {
                buffs.unlimited_energy = Some(TimedBuff::new(speed_multiplier, unlimited_duration));
            }
            0.0
        }
    }
}
