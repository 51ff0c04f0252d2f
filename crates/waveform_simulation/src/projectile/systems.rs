//! Projectile systems: homing steer, movement, collisions, chaining.

use bevy::prelude::*;

use super::chain::find_chain_target;
use super::components::{HomingState, WaveformProjectile};
use super::homing::{steer_velocity, target_still_valid};
use crate::combat::systems::damage::DamageContext;
use crate::combat::{Dead, DecalRequested, HitOutcome, HitSource, ProjectileSpawned, WaveformHit};
use crate::components::Actor;
use crate::config::CombatConfig;
use crate::physics::{ColliderWorld, PhysicsQuery, COLLISION_LAYER_ACTORS, COLLISION_LAYER_ENVIRONMENT};

/// Spawn projectile body at `position`. Caller emits `ProjectileSpawned`.
pub fn spawn_projectile(commands: &mut Commands, projectile: WaveformProjectile, position: Vec3) -> Entity {
    commands
        .spawn((projectile, Transform::from_translation(position)))
        .id()
}

/// System: homing steer (drop stale/out-of-cone targets, rate-limited turn)
///
/// Цели не ищутся повторно - захват только при выстреле.
pub fn steer_homing_projectiles(
    mut projectiles: Query<(Entity, &Transform, &mut WaveformProjectile)>,
    physics: Res<ColliderWorld>,
    config: Res<CombatConfig>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, transform, mut projectile) in projectiles.iter_mut() {
        let Some(mut homing) = projectile.homing else {
            continue;
        };
        let Some(target) = homing.target else {
            continue;
        };

        let position = transform.translation;
        let target_position = physics.position_of(target);

        if !target_still_valid(
            position,
            projectile.velocity,
            target_position,
            homing.range,
            config.homing_retain_cone,
        ) {
            homing.target = None;
            projectile.homing = Some(homing);
            crate::logger::log(&format!("🎯 Projectile {:?} lost target {:?}", entity, target));
            continue;
        }

        if let Some(target_position) = target_position {
            let speed = projectile.speed;
            projectile.velocity =
                steer_velocity(projectile.velocity, position, target_position, homing.strength, delta, speed);
        }
    }
}

/// System: движение, lifetime, коллизии с геометрией и актёрами
///
/// 1. lifetime истёк → despawn
/// 2. ray по смещению против Environment ограничивает шаг
/// 3. sphere sweep по шагу → первый чужой актёр до стены → DamageContext::apply_hit
/// 4. актёров нет, есть стена → DecalRequested + despawn (без урона)
/// 5. попадание засчитано и есть chain → ровно один вторичный снаряд (без chain)
#[allow(clippy::too_many_arguments)]
pub fn advance_projectiles(
    mut projectiles: Query<(Entity, &mut Transform, &mut WaveformProjectile)>,
    actors: Query<&Actor, Without<Dead>>,
    physics: Res<ColliderWorld>,
    config: Res<CombatConfig>,
    mut damage: DamageContext,
    mut decals: EventWriter<DecalRequested>,
    mut spawned: EventWriter<ProjectileSpawned>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, mut projectile) in projectiles.iter_mut() {
        projectile.lifetime -= delta;
        if projectile.lifetime <= 0.0 {
            damage.commands.entity(entity).try_despawn();
            continue;
        }

        let start = transform.translation;
        let step = projectile.velocity * delta;
        let direction = projectile.direction();
        let travel = step.length();

        // 1. Геометрия: центр снаряда не заходит глубже radius в стену
        let wall = if travel > 0.0 {
            physics.cast_ray(
                start,
                direction,
                travel + projectile.radius,
                COLLISION_LAYER_ENVIRONMENT,
                None,
            )
        } else {
            None
        };
        let reach = wall.map_or(travel, |wall| (wall.distance - projectile.radius).clamp(0.0, travel));

        // 2. Актёры: sweep по всему отрезку шага (быстрый снаряд не проскакивает цель)
        let owner = projectile.owner;
        let owner_faction = projectile.owner_faction;
        let ignore = projectile.ignore;
        let is_opponent = |candidate: Entity| {
            candidate != owner && actors.get(candidate).is_ok_and(|actor| actor.is_hostile_to(owner_faction))
        };

        let contacts = physics
            .sweep_sphere(start, direction, reach, projectile.radius, COLLISION_LAYER_ACTORS)
            .into_iter()
            .filter(|hit| Some(hit.entity) != ignore && is_opponent(hit.entity));

        let mut resolved = None;
        for contact in contacts {
            let hit = WaveformHit {
                attacker: owner,
                target: contact.entity,
                waveform: projectile.waveform,
                amount: projectile.damage,
                source: if projectile.chained {
                    HitSource::Chain
                } else {
                    HitSource::Projectile
                },
                direction,
                impact_point: contact.point,
            };

            // Ignored: цель умерла раньше в этом тике - летим дальше
            let outcome = damage.apply_hit(&hit);
            if outcome != HitOutcome::Ignored {
                resolved = Some((contact.entity, contact.point, outcome));
                break;
            }
        }

        let Some((target, end, outcome)) = resolved else {
            if let Some(wall) = wall {
                decals.write(DecalRequested {
                    point: wall.point,
                    normal: wall.normal,
                    waveform: projectile.waveform,
                });
                damage.commands.entity(entity).try_despawn();
            } else {
                transform.translation = start + step;
            }
            continue;
        };

        transform.translation = end;
        damage.commands.entity(entity).try_despawn();

        if !matches!(outcome, HitOutcome::Damaged { .. }) || projectile.chained {
            continue;
        }
        let Some(chain_range) = projectile.chain_range else {
            continue;
        };

        // 3. Chain (глубина ровно 1)
        let Some(next) = find_chain_target(&*physics, end, chain_range, &[target, owner], is_opponent) else {
            continue;
        };
        let Some(next_position) = physics.position_of(next) else {
            continue;
        };

        let chain_direction = (next_position - end).normalize_or(direction);
        let chain = WaveformProjectile {
            velocity: chain_direction * projectile.speed,
            lifetime: config.projectile_lifetime,
            homing: projectile.homing.map(|homing| HomingState {
                target: Some(next),
                ..homing
            }),
            chain_range: None,
            chained: true,
            ignore: Some(target),
            ..projectile.clone()
        };
        let waveform = chain.waveform;
        let chain_entity = spawn_projectile(&mut damage.commands, chain, end);

        spawned.write(ProjectileSpawned {
            projectile: chain_entity,
            owner,
            waveform,
            position: end,
            chained: true,
        });
        crate::logger::log(&format!("⛓️ Chain {:?} → {:?} (from {:?})", waveform.as_str(), next, target));
    }
}
