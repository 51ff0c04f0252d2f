//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, Energy, ramp stacks, status effects, counter buffs
//! - Combat rules: resource costs, damage pipeline, death
//! - Events: presentation notifications (ResourceChanged, DamageDealt, EntityDied, ...)
//!
//! Хост (presentation) отвечает за input, анимации, VFX и сам physics движок:
//! ядро видит мир только через `PhysicsQuery`.

use bevy::prelude::*;

pub mod attacker;
pub mod damage;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use attacker::{tick_attack_cooldowns, AttackCooldown};
pub use damage::{
    attack_energy_cost, calculate_outgoing_damage, consume_attack_resources, final_incoming_damage,
    incoming_modifiers, ramped_damage, AttackPayment, Dead, DespawnAfter, HitOutcome,
};
pub use events::*;
pub use systems::DamageContext;

use crate::counter::{self, CounterEvent, CounterIntent};
use crate::physics::{sync_collider_world, ColliderWorld};
use crate::projectile;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (60Hz).
///
/// Порядок выполнения (один тик):
/// 1. sync_collider_world - snapshot коллайдеров (живые тела)
/// 2. tick_attack_cooldowns
/// 3. start_counter_windows - CounterIntent → окно
/// 4. process_attack_intents - ресурсы, урон, hitscan ray / spawn снаряда
/// 5. apply_waveform_hits - hitscan + внешние удары (counter → damage)
/// 6. steer_homing_projectiles → advance_projectiles - полёт, попадания, chain
/// 7. tick_counter_systems - окно/cooldown/баффы
/// 8. regenerate_energy, tick_status_effects, tick_damage_ramps
/// 9. despawn_after_timeout
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ColliderWorld>();

        // Регистрация событий
        app.add_event::<AttackIntent>()
            .add_event::<CounterIntent>()
            .add_event::<WaveformHit>()
            .add_event::<ResourceChanged>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<StatusEffectAdded>()
            .add_event::<KnockbackApplied>()
            .add_event::<DecalRequested>()
            .add_event::<HitscanTraced>()
            .add_event::<ProjectileSpawned>()
            .add_event::<CounterEvent>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: World snapshot + timers gating this tick's input
                sync_collider_world,
                tick_attack_cooldowns,
                // Фаза 2: Intents
                counter::systems::start_counter_windows,
                systems::process_attack_intents,
                // Фаза 3: Hit resolution
                systems::apply_waveform_hits,
                projectile::steer_homing_projectiles,
                projectile::advance_projectiles,
                // Фаза 4: Upkeep
                counter::systems::tick_counter_systems,
                systems::regenerate_energy,
                systems::tick_status_effects,
                systems::tick_damage_ramps,
                systems::despawn_after_timeout,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
