//! EnemyShooter - reactive fire decision (без движения и pathfinding)
//!
//! Враг стреляет в ближайшего живого противника в радиусе, с интервалом
//! `interval ± jitter`. Jitter берётся из DeterministicRng → одинаковый seed
//! даёт одинаковую последовательность выстрелов.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::{AttackIntent, Dead};
use crate::components::Actor;
use crate::DeterministicRng;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnemyShooter {
    /// Средний интервал между выстрелами (секунды)
    pub interval: f32,
    /// Случайное отклонение интервала (± секунды)
    pub jitter: f32,
    /// Дистанция, с которой враг начинает стрелять (м)
    pub range: f32,
    /// Время до следующего решения
    pub timer: f32,
}

impl Default for EnemyShooter {
    fn default() -> Self {
        Self {
            interval: 1.5,
            jitter: 0.5,
            range: 30.0,
            timer: 1.0,
        }
    }
}

/// Nearest opposing actor within `range`; ties go to the lower Entity.
pub fn nearest_opponent(
    position: Vec3,
    faction_id: u64,
    range: f32,
    candidates: impl IntoIterator<Item = (Entity, u64, Vec3)>,
) -> Option<(Entity, Vec3)> {
    candidates
        .into_iter()
        .filter(|(_, faction, _)| *faction != faction_id)
        .map(|(entity, _, target)| (entity, target, target.distance(position)))
        .filter(|(_, _, distance)| *distance <= range)
        .min_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)))
        .map(|(entity, target, _)| (entity, target))
}

/// System: AI fire intents (ECS strategic decision)
pub fn enemy_fire_intents(
    mut shooters: Query<(Entity, &Actor, &Transform, &mut EnemyShooter), Without<Dead>>,
    targets: Query<(Entity, &Actor, &Transform), Without<Dead>>,
    mut rng: ResMut<DeterministicRng>,
    mut intents: EventWriter<AttackIntent>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, actor, transform, mut shooter) in shooters.iter_mut() {
        shooter.timer -= delta;
        if shooter.timer > 0.0 {
            continue;
        }

        let position = transform.translation;
        let candidates = targets
            .iter()
            .map(|(target, other, target_transform)| (target, other.faction_id, target_transform.translation));

        let Some((target, target_position)) = nearest_opponent(position, actor.faction_id, shooter.range, candidates)
        else {
            shooter.timer = 0.0;
            continue;
        };

        let direction = (target_position - position).normalize_or_zero();
        if direction == Vec3::ZERO {
            continue;
        }

        intents.write(AttackIntent {
            attacker: entity,
            origin: position,
            direction,
        });

        let jitter = shooter.jitter.abs();
        shooter.timer = (shooter.interval + rng.rng.gen_range(-jitter..=jitter)).max(0.05);

        crate::logger::log(&format!(
            "🤖 Actor {:?} fires at {:?} (next in {:.2}s)",
            entity, target, shooter.timer
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_opponent_ignores_allies_and_range() {
        let ally = (Entity::from_raw(1), 7, Vec3::new(1.0, 0.0, 0.0));
        let near = (Entity::from_raw(2), 1, Vec3::new(5.0, 0.0, 0.0));
        let far = (Entity::from_raw(3), 1, Vec3::new(50.0, 0.0, 0.0));

        let found = nearest_opponent(Vec3::ZERO, 7, 30.0, [ally, near, far]);
        assert_eq!(found, Some((Entity::from_raw(2), Vec3::new(5.0, 0.0, 0.0))));

        assert_eq!(nearest_opponent(Vec3::ZERO, 7, 3.0, [ally, near, far]), None);
    }

    #[test]
    fn test_tie_breaks_by_entity() {
        let a = (Entity::from_raw(9), 1, Vec3::new(5.0, 0.0, 0.0));
        let b = (Entity::from_raw(4), 1, Vec3::new(-5.0, 0.0, 0.0));

        let found = nearest_opponent(Vec3::ZERO, 2, 30.0, [a, b]);
        assert_eq!(found.map(|(entity, _)| entity), Some(Entity::from_raw(4)));
    }
}
