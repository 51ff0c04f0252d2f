//! Damage application and death systems.
//!
//! Все пути урона (projectile, chain, hitscan, external, reflected) идут через
//! `DamageContext::apply_hit`, синхронно в контексте атакующего.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::damage::{final_incoming_damage, incoming_modifiers, Dead, DespawnAfter, HitOutcome};
use crate::combat::events::{
    DamageDealt, EntityDied, HitSource, KnockbackApplied, ResourceChanged, ResourceKind, StatusEffectAdded,
    WaveformHit,
};
use crate::components::{
    EquippedWaveform, Health, HitRampTracker, Immunities, StatusEffect, StatusEffectKind, StatusEffects,
};
use crate::config::CombatConfig;
use crate::counter::{CounterEvent, CounterSystem};
use crate::waveform::WaveformLibrary;

type DamageTargetData = (
    &'static mut Health,
    &'static mut StatusEffects,
    Option<&'static mut CounterSystem>,
    &'static EquippedWaveform,
    &'static Immunities,
    &'static mut HitRampTracker,
);

/// Результат разрешения на стороне цели (до возможного отражения)
enum TargetResolution {
    Done(HitOutcome),
    Reflect,
}

/// Everything a hit needs to resolve against its target in one synchronous call.
#[derive(SystemParam)]
pub struct DamageContext<'w, 's> {
    pub commands: Commands<'w, 's>,
    library: Res<'w, WaveformLibrary>,
    config: Res<'w, CombatConfig>,
    time: Res<'w, Time>,
    targets: Query<'w, 's, DamageTargetData>,
    resource_events: EventWriter<'w, ResourceChanged>,
    damage_events: EventWriter<'w, DamageDealt>,
    death_events: EventWriter<'w, EntityDied>,
    status_events: EventWriter<'w, StatusEffectAdded>,
    knockback_events: EventWriter<'w, KnockbackApplied>,
    counter_events: EventWriter<'w, CounterEvent>,
}

impl DamageContext<'_, '_> {
    /// Разрешает удар по цели: counter → reflect → immunity → hit ramp → урон.
    ///
    /// Отражённый удар разрешается сразу же против атакующего, но сам
    /// никогда не отражается повторно (глубина ≤ 1).
    pub fn apply_hit(&mut self, hit: &WaveformHit) -> HitOutcome {
        match self.resolve_on_target(hit) {
            TargetResolution::Done(outcome) => outcome,
            TargetResolution::Reflect => {
                let reflected = WaveformHit {
                    attacker: hit.target,
                    target: hit.attacker,
                    source: HitSource::Reflected,
                    direction: -hit.direction,
                    ..hit.clone()
                };
                crate::logger::log(&format!(
                    "🪞 {:?} reflected {} hit back to {:?}",
                    hit.target,
                    hit.waveform.as_str(),
                    hit.attacker
                ));
                self.apply_hit(&reflected);
                HitOutcome::Reflected
            }
        }
    }

    fn resolve_on_target(&mut self, hit: &WaveformHit) -> TargetResolution {
        let Some(waveform) = self.library.get(hit.waveform) else {
            crate::logger::log_warning(&format!("WaveformHit with unknown waveform {:?} (ignored)", hit.waveform));
            return TargetResolution::Done(HitOutcome::Ignored);
        };
        let counter_effect = waveform.counter;
        let hit_ramp = waveform.hit_ramp;
        let knockback_force = waveform.knockback_force;

        let now = self.time.elapsed_secs();
        let max_resistance = self.config.max_damage_resistance;

        let Ok((mut health, mut statuses, mut counter, equipped, immunities, mut hit_ramps)) =
            self.targets.get_mut(hit.target)
        else {
            // stale handle: цель уже деспавнена
            return TargetResolution::Done(HitOutcome::Ignored);
        };

        if !health.is_alive() {
            return TargetResolution::Done(HitOutcome::Ignored);
        }

        // 1. Counter window
        if let Some(counter) = counter.as_mut() {
            if counter.can_counter(hit.waveform, equipped.0, hit.attacker, hit.target) {
                let resolution = counter.resolve_counter(hit.waveform, &counter_effect);
                let healed = health.heal(resolution.heal);

                self.counter_events.write(CounterEvent::Succeeded {
                    entity: hit.target,
                    attacker: hit.attacker,
                    waveform: hit.waveform,
                    stacks: resolution.stacks,
                    saturated: resolution.saturated,
                });
                if healed > 0.0 {
                    self.resource_events.write(ResourceChanged {
                        entity: hit.target,
                        resource: ResourceKind::Health,
                        current: health.current,
                        max: health.max,
                    });
                }

                crate::logger::log(&format!(
                    "🛡️ {:?} countered {} from {:?} (stacks: {}{})",
                    hit.target,
                    hit.waveform.as_str(),
                    hit.attacker,
                    resolution.stacks,
                    if resolution.saturated { ", SATURATION" } else { "" }
                ));
                return TargetResolution::Done(HitOutcome::Countered);
            }

            // 2. Reflect (отражение отражения запрещено)
            if counter.is_reflecting() && hit.source != HitSource::Reflected && hit.attacker != hit.target {
                return TargetResolution::Reflect;
            }
        }

        // 3. Immunity → counter-trigger статус вместо урона
        if immunities.contains(hit.waveform) {
            let duration = self.config.counter_trigger_duration;
            statuses.add(StatusEffect::new(StatusEffectKind::CounterTrigger, hit.amount, duration));
            self.status_events.write(StatusEffectAdded {
                entity: hit.target,
                kind: StatusEffectKind::CounterTrigger,
                strength: hit.amount,
                duration,
            });
            return TargetResolution::Done(HitOutcome::Immune);
        }

        // 4. Incoming hit ramp (повторные попадания тем же waveform от того же источника)
        let mut amount = hit.amount;
        if let Some(config) = hit_ramp {
            if hit.source != HitSource::Reflected {
                amount *= hit_ramps.register_hit(hit.attacker, hit.waveform, now, &config);
            }
        }

        // 5. Resistance / received multiplier
        let (resistance, multiplier) = incoming_modifiers(&statuses, counter.as_deref(), max_resistance);
        let final_damage = final_incoming_damage(amount, resistance, multiplier);

        let applied = health.take_damage(final_damage);
        let killed = !health.is_alive();

        self.resource_events.write(ResourceChanged {
            entity: hit.target,
            resource: ResourceKind::Health,
            current: health.current,
            max: health.max,
        });
        self.damage_events.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            waveform: hit.waveform,
            damage: applied,
            source: hit.source,
            impact_point: hit.impact_point,
            target_died: killed,
        });

        if knockback_force > 0.0 {
            let impulse = hit.direction.normalize_or_zero() * knockback_force;
            if impulse != Vec3::ZERO {
                self.knockback_events.write(KnockbackApplied {
                    entity: hit.target,
                    impulse,
                });
            }
        }

        if killed {
            // Открытое окно гасится в том же тике, без cooldown
            if let Some(successes) = counter.as_mut().and_then(|counter| counter.cancel_window()) {
                self.counter_events.write(CounterEvent::WindowEnded {
                    entity: hit.target,
                    successes,
                    cooldown_started: false,
                });
            }

            self.death_events.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.attacker),
            });
            self.commands.entity(hit.target).try_insert((
                Dead,
                DespawnAfter {
                    despawn_time: now + self.config.death_grace_period,
                },
            ));

            crate::logger::log_info(&format!("💀 Entity {:?} killed by {:?}", hit.target, hit.attacker));
        }

        TargetResolution::Done(HitOutcome::Damaged {
            amount: applied,
            killed,
        })
    }
}

/// System: разрешение WaveformHit событий (hitscan + внешние источники)
pub fn apply_waveform_hits(mut hits: EventReader<WaveformHit>, mut damage: DamageContext) {
    for hit in hits.read() {
        damage.apply_hit(hit);
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(mut commands: Commands, query: Query<(Entity, &DespawnAfter)>, time: Res<Time>) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).try_despawn();
        }
    }
}
