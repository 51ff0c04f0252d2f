//! Attack intents → resources → damage → hitscan ray or projectile body.

use bevy::prelude::*;

use crate::combat::attacker::AttackCooldown;
use crate::combat::damage::{calculate_outgoing_damage, consume_attack_resources, AttackPayment, Dead};
use crate::combat::events::{
    AttackIntent, DecalRequested, HitSource, HitscanTraced, ProjectileSpawned, ResourceChanged, ResourceKind,
    WaveformHit,
};
use crate::components::{Actor, Energy, EquippedWaveform, Health, RampStacks, StatusEffects};
use crate::config::CombatConfig;
use crate::counter::CounterSystem;
use crate::physics::{get_layer_name, ColliderWorld, PhysicsQuery, COLLISION_LAYER_ENVIRONMENT, COLLISION_MASK_COMBAT};
use crate::projectile::homing::acquire_target;
use crate::projectile::{spawn_projectile, HomingState, WaveformProjectile};
use crate::waveform::{WaveformLibrary, WaveformType};

type AttackerData = (
    &'static Actor,
    &'static EquippedWaveform,
    &'static mut Health,
    &'static mut Energy,
    &'static mut RampStacks,
    &'static StatusEffects,
    &'static mut AttackCooldown,
    Option<&'static mut CounterSystem>,
);

/// System: обработка AttackIntent
///
/// Порядок: cooldown → списание ресурсов (по стеку до атаки) → расчёт урона
/// (стек +1) → hitscan или spawn снаряда. Нет waveform / ресурсов - тихий no-op.
#[allow(clippy::too_many_arguments)]
pub fn process_attack_intents(
    mut commands: Commands,
    mut intents: EventReader<AttackIntent>,
    mut attackers: Query<AttackerData, Without<Dead>>,
    opponents: Query<(Entity, &Actor), Without<Dead>>,
    library: Res<WaveformLibrary>,
    config: Res<CombatConfig>,
    physics: Res<ColliderWorld>,
    mut hits: EventWriter<WaveformHit>,
    mut resource_events: EventWriter<ResourceChanged>,
    mut decals: EventWriter<DecalRequested>,
    mut traces: EventWriter<HitscanTraced>,
    mut spawned: EventWriter<ProjectileSpawned>,
) {
    for intent in intents.read() {
        let Ok((actor, equipped, mut health, mut energy, mut ramp, statuses, mut cooldown, mut counter)) =
            attackers.get_mut(intent.attacker)
        else {
            continue;
        };

        if !health.is_alive() || !cooldown.is_ready() {
            continue;
        }

        let Some(kind) = equipped.0 else {
            crate::logger::log(&format!("AttackIntent from {:?} without equipped waveform", intent.attacker));
            continue;
        };
        let Some(waveform) = library.get(kind) else {
            crate::logger::log_warning(&format!("Waveform {:?} missing from library (attack ignored)", kind));
            continue;
        };

        let direction = intent.direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            crate::logger::log_warning(&format!("AttackIntent from {:?} with zero direction", intent.attacker));
            continue;
        }

        // Ресурсы
        let unlimited = counter.as_ref().is_some_and(|counter| counter.has_unlimited_energy());
        let Some(payment) = consume_attack_resources(waveform, &ramp, &mut health, &mut energy, unlimited) else {
            crate::logger::log(&format!(
                "⚡ {:?} can't afford {} (energy {:.1}/{:.1})",
                intent.attacker,
                kind.as_str(),
                energy.current,
                energy.max
            ));
            continue;
        };

        if payment != AttackPayment::Free {
            resource_events.write(ResourceChanged {
                entity: intent.attacker,
                resource: ResourceKind::Energy,
                current: energy.current,
                max: energy.max,
            });
        }
        if let AttackPayment::HealthFallback(cost) = payment {
            resource_events.write(ResourceChanged {
                entity: intent.attacker,
                resource: ResourceKind::Health,
                current: health.current,
                max: health.max,
            });
            crate::logger::log(&format!("🩸 {:?} paid {:.1} health for {}", intent.attacker, cost, kind.as_str()));
        }

        cooldown.start(waveform.attack_cooldown);

        let damage = calculate_outgoing_damage(
            waveform,
            &mut ramp,
            statuses,
            counter.as_deref_mut(),
            config.ramp_reset_window,
        );

        if let Some(hitscan) = waveform.hitscan {
            let trace = resolve_hitscan(
                &*physics,
                &opponents,
                intent,
                actor.faction_id,
                waveform,
                direction,
                hitscan.range,
                damage,
            );

            if let Some(decal) = trace.decal {
                decals.write(decal);
            }
            if let Some(hit) = trace.hit {
                hits.write(hit);
            }
            traces.write(trace.traced);
            continue;
        }

        // chain_ready от counter расходуется ближайшим снарядом
        let chain_granted = counter.as_deref_mut().is_some_and(CounterSystem::take_chain_ready);
        let chain_range = waveform
            .chain
            .map(|chain| chain.range)
            .or(chain_granted.then_some(config.default_chain_range));

        let homing = waveform.homing.map(|homing| {
            let candidates = opponents
                .iter()
                .filter(|(entity, other)| *entity != intent.attacker && other.is_hostile_to(actor.faction_id))
                .filter_map(|(entity, _)| physics.position_of(entity).map(|position| (entity, position)));

            HomingState {
                target: acquire_target(
                    intent.origin,
                    direction,
                    homing.range,
                    config.homing_acquire_cone,
                    candidates,
                ),
                strength: homing.strength,
                range: homing.range,
            }
        });

        let projectile = WaveformProjectile {
            owner: intent.attacker,
            owner_faction: actor.faction_id,
            waveform: kind,
            damage,
            velocity: direction * waveform.projectile.speed,
            speed: waveform.projectile.speed,
            radius: waveform.projectile.radius,
            lifetime: config.projectile_lifetime,
            homing,
            chain_range,
            chained: false,
            ignore: None,
        };
        let projectile = spawn_projectile(&mut commands, projectile, intent.origin);

        spawned.write(ProjectileSpawned {
            projectile,
            owner: intent.attacker,
            waveform: kind,
            position: intent.origin,
            chained: false,
        });
        crate::logger::log(&format!(
            "🔫 {:?} fired {} ({:.1} dmg{})",
            intent.attacker,
            kind.as_str(),
            damage,
            if chain_granted { ", chain" } else { "" }
        ));
    }
}

/// Outcome of one hitscan ray.
struct HitscanTrace {
    traced: HitscanTraced,
    decal: Option<DecalRequested>,
    hit: Option<WaveformHit>,
}

/// Ray до первого Actor/Environment. Геометрия → декаль; чужой актёр → WaveformHit
/// (counter/урон разрешаются в `apply_waveform_hits`). Промах - полный range.
#[allow(clippy::too_many_arguments)]
fn resolve_hitscan(
    physics: &impl PhysicsQuery,
    opponents: &Query<(Entity, &Actor), Without<Dead>>,
    intent: &AttackIntent,
    faction_id: u64,
    waveform: &WaveformType,
    direction: Vec3,
    range: f32,
    damage: f32,
) -> HitscanTrace {
    let ray = physics.cast_ray(intent.origin, direction, range, COLLISION_MASK_COMBAT, Some(intent.attacker));

    let mut trace = HitscanTrace {
        traced: HitscanTraced {
            shooter: intent.attacker,
            waveform: waveform.kind,
            origin: intent.origin,
            end: ray.map_or(intent.origin + direction * range, |ray| ray.point),
            hit: None,
        },
        decal: None,
        hit: None,
    };

    let Some(ray) = ray else {
        return trace;
    };

    crate::logger::log(&format!(
        "📡 Hitscan {} hit {:?} [{}] at {:.1}m",
        waveform.kind.as_str(),
        ray.entity,
        get_layer_name(ray.layer),
        ray.distance
    ));

    if ray.layer & COLLISION_LAYER_ENVIRONMENT != 0 {
        trace.decal = Some(DecalRequested {
            point: ray.point,
            normal: ray.normal,
            waveform: waveform.kind,
        });
        return trace;
    }

    let hostile = opponents
        .get(ray.entity)
        .is_ok_and(|(_, actor)| actor.is_hostile_to(faction_id));
    if !hostile {
        return trace;
    }

    trace.traced.hit = Some(ray.entity);
    trace.hit = Some(WaveformHit {
        attacker: intent.attacker,
        target: ray.entity,
        waveform: waveform.kind,
        amount: damage,
        source: HitSource::Hitscan,
        direction,
        impact_point: ray.point,
    });
    trace
}
