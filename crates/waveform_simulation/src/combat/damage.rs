//! Damage pipeline (pure functions, no ECS access)
//!
//! Outgoing: consume_attack_resources → calculate_outgoing_damage
//! Incoming: counter → reflect → immunity → hit ramp → resistance/multiplier
//!
//! ECS обвязка (events, commands) - в `combat::systems::damage`.

use bevy::prelude::*;

use crate::components::{Energy, Health, RampStacks, StatusEffectKind, StatusEffects};
use crate::counter::CounterSystem;
use crate::waveform::{RampConfig, WaveformType};

/// Компонент-маркер: entity мертв (Health reached 0)
///
/// Мёртвые не атакуют, не попадают в physics queries и не получают урон.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    /// Время деспавна (elapsed seconds симуляции)
    pub despawn_time: f32,
}

/// Чем оплачена атака
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackPayment {
    Energy(f32),
    /// Energy was short: fixed health cost paid, energy zeroed
    HealthFallback(f32),
    /// Unlimited energy buff
    Free,
}

/// Итог разрешения одного удара по цели
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Stale/dead target or unknown waveform
    Ignored,
    /// Intercepted by the target's counter window and turned into a buff
    Countered,
    /// Bounced back to the attacker by a reflect buff
    Reflected,
    /// Target is immune: counter-trigger status instead of damage
    Immune,
    Damaged { amount: f32, killed: bool },
}

/// Energy cost of the next attack: `cost × (1 + surcharge × stacks)` while ramping.
pub fn attack_energy_cost(waveform: &WaveformType, ramp: &RampStacks) -> f32 {
    let base = waveform.energy_cost.max(0.0);
    match waveform.ramp {
        Some(config) => base * (1.0 + config.energy_surcharge_per_stack * ramp.stacks(waveform.kind) as f32),
        None => base,
    }
}

/// Списывает ресурсы за атаку. `None` - не хватает ни energy, ни health.
///
/// Health fallback требует `health > cost`: атака никогда не убивает стрелка.
pub fn consume_attack_resources(
    waveform: &WaveformType,
    ramp: &RampStacks,
    health: &mut Health,
    energy: &mut Energy,
    unlimited_energy: bool,
) -> Option<AttackPayment> {
    if unlimited_energy {
        return Some(AttackPayment::Free);
    }

    let cost = attack_energy_cost(waveform, ramp);
    if energy.consume(cost) {
        return Some(AttackPayment::Energy(cost));
    }

    let fallback = waveform.health_fallback_cost?;
    if health.current <= fallback {
        return None;
    }

    health.take_damage(fallback);
    energy.drain();
    Some(AttackPayment::HealthFallback(fallback))
}

/// Linear ramp between `base` (0 stacks) and `base × max_multiplier` (max stacks).
pub fn ramped_damage(base: f32, config: &RampConfig, stacks: u32) -> f32 {
    if config.max_stacks == 0 {
        return base;
    }
    let t = (stacks.min(config.max_stacks) as f32 / config.max_stacks as f32).clamp(0.0, 1.0);
    base + (base * config.max_multiplier - base) * t
}

/// Урон исходящей атаки
///
/// 1. base damage экипированного waveform
/// 2. ramp: интерполяция по текущему стеку, затем стек +1 и рестарт таймера
/// 3. × DamageBoost статус
/// 4. × одноразовый next-hit multiplier от counter (потребляется)
pub fn calculate_outgoing_damage(
    waveform: &WaveformType,
    ramp: &mut RampStacks,
    statuses: &StatusEffects,
    counter: Option<&mut CounterSystem>,
    ramp_reset_window: f32,
) -> f32 {
    let mut damage = waveform.base_damage.max(0.0);

    if let Some(config) = waveform.ramp {
        damage = ramped_damage(damage, &config, ramp.stacks(waveform.kind));
        ramp.register_attack(waveform.kind, config.max_stacks, ramp_reset_window);
    }

    damage *= statuses.strength_or(StatusEffectKind::DamageBoost, 1.0);

    if let Some(counter) = counter {
        damage *= counter.take_next_hit_multiplier();
    }

    damage.max(0.0)
}

/// Суммарные модификаторы входящего урона: (resistance, received multiplier)
///
/// Resistance from status and counter add up and are clamped to `max_resistance`.
pub fn incoming_modifiers(
    statuses: &StatusEffects,
    counter: Option<&CounterSystem>,
    max_resistance: f32,
) -> (f32, f32) {
    let mut resistance = statuses.strength_or(StatusEffectKind::DamageResistance, 0.0);
    let mut multiplier = statuses.strength_or(StatusEffectKind::DamageVulnerability, 1.0);

    if let Some(counter) = counter {
        resistance += counter.damage_resistance();
        multiplier *= counter.damage_received_multiplier();
    }

    (resistance.clamp(0.0, max_resistance.max(0.0)), multiplier.max(0.0))
}

/// `amount × (1 − resistance) × multiplier`
pub fn final_incoming_damage(amount: f32, resistance: f32, multiplier: f32) -> f32 {
    (amount.max(0.0) * (1.0 - resistance) * multiplier).max(0.0)
}
