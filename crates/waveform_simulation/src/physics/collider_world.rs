//! Brute-force `PhysicsQuery` over `Collider` snapshots.
//!
//! Snapshot пересобирается в начале каждого тика (`sync_collider_world`),
//! тела отсортированы по Entity - порядок результатов детерминирован.

use bevy::prelude::*;

use super::{Collider, ColliderShape, PhysicsQuery, RayHit};
use crate::combat::Dead;

#[derive(Debug, Clone, Copy)]
struct ColliderBody {
    entity: Entity,
    position: Vec3,
    collider: Collider,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ColliderWorld {
    bodies: Vec<ColliderBody>,
}

impl ColliderWorld {
    /// Adds or moves a body.
    pub fn insert(&mut self, entity: Entity, position: Vec3, collider: Collider) {
        let body = ColliderBody {
            entity,
            position,
            collider,
        };
        match self.bodies.binary_search_by_key(&entity, |b| b.entity) {
            Ok(index) => self.bodies[index] = body,
            Err(index) => self.bodies.insert(index, body),
        }
    }

    pub fn remove(&mut self, entity: Entity) {
        if let Ok(index) = self.bodies.binary_search_by_key(&entity, |b| b.entity) {
            self.bodies.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn body(&self, entity: Entity) -> Option<&ColliderBody> {
        self.bodies
            .binary_search_by_key(&entity, |b| b.entity)
            .ok()
            .map(|index| &self.bodies[index])
    }
}

impl PhysicsQuery for ColliderWorld {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
        exclude: Option<Entity>,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let mut nearest: Option<RayHit> = None;
        for body in &self.bodies {
            if Some(body.entity) == exclude || !body.collider.is_in(mask) {
                continue;
            }

            let hit = match body.collider.shape {
                ColliderShape::Sphere { radius } => ray_sphere(origin, direction, body.position, radius),
                ColliderShape::Box { half_extents } => ray_aabb(origin, direction, body.position, half_extents),
            };
            let Some((distance, normal)) = hit else {
                continue;
            };
            if distance > max_distance {
                continue;
            }

            // strict < - при равенстве побеждает меньший Entity
            if nearest.is_none_or(|n| distance < n.distance) {
                nearest = Some(RayHit {
                    entity: body.entity,
                    point: origin + direction * distance,
                    normal,
                    distance,
                    layer: body.collider.layer,
                });
            }
        }

        nearest
    }

    fn sweep_sphere(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        radius: f32,
        mask: u32,
    ) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        let radius = radius.max(0.0);
        let max_distance = max_distance.max(0.0);

        // Minkowski: луч центра против формы, раздутой на radius
        let mut hits: Vec<RayHit> = self
            .bodies
            .iter()
            .filter(|body| body.collider.is_in(mask))
            .filter_map(|body| {
                let (distance, normal) = match body.collider.shape {
                    ColliderShape::Sphere { radius: body_radius } => {
                        ray_sphere(origin, direction, body.position, body_radius + radius)?
                    }
                    ColliderShape::Box { half_extents } => {
                        ray_aabb(origin, direction, body.position, half_extents + Vec3::splat(radius))?
                    }
                };
                (distance <= max_distance).then(|| RayHit {
                    entity: body.entity,
                    point: origin + direction * distance,
                    normal,
                    distance,
                    layer: body.collider.layer,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.entity.cmp(&b.entity)));
        hits
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32) -> Vec<Entity> {
        let mut hits: Vec<(f32, Entity)> = self
            .bodies
            .iter()
            .filter(|body| body.collider.is_in(mask))
            .filter_map(|body| {
                let distance = match body.collider.shape {
                    ColliderShape::Sphere { radius: body_radius } => {
                        (body.position.distance(center) - body_radius).max(0.0)
                    }
                    ColliderShape::Box { half_extents } => {
                        let closest = center.clamp(body.position - half_extents, body.position + half_extents);
                        closest.distance(center)
                    }
                };
                (distance <= radius).then_some((body.position.distance_squared(center), body.entity))
            })
            .collect();

        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, entity)| entity).collect()
    }

    fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.body(entity).map(|body| body.position)
    }
}

/// Ray vs sphere: (distance, surface normal). Origin inside → distance 0.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<(f32, Vec3)> {
    let offset = origin - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some((0.0, -direction));
    }

    let b = offset.dot(direction);
    if b > 0.0 {
        // смотрим от сферы
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let distance = -b - discriminant.sqrt();
    let point = origin + direction * distance;
    Some((distance, (point - center).normalize_or(-direction)))
}

/// Ray vs AABB (slab method): (distance, face normal). Origin inside → distance 0.
fn ray_aabb(origin: Vec3, direction: Vec3, center: Vec3, half_extents: Vec3) -> Option<(f32, Vec3)> {
    let min = center - half_extents;
    let max = center + half_extents;

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let mut t1 = (min[axis] - o) / d;
        let mut t2 = (max[axis] - o) / d;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        if t1 > t_enter {
            t_enter = t1;
            enter_normal = Vec3::ZERO;
            enter_normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(t2);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    if t_enter < 0.0 {
        return Some((0.0, -direction));
    }
    Some((t_enter, enter_normal))
}

/// System: snapshot всех живых коллайдеров (мёртвые не участвуют в запросах)
pub fn sync_collider_world(
    mut world: ResMut<ColliderWorld>,
    colliders: Query<(Entity, &Transform, &Collider), Without<Dead>>,
) {
    world.clear();
    for (entity, transform, collider) in colliders.iter() {
        world.insert(entity, transform.translation, *collider);
    }
}
