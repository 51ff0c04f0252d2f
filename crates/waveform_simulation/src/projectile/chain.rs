//! Chain target selection

use bevy::prelude::*;

use crate::physics::{PhysicsQuery, COLLISION_LAYER_ACTORS};

/// Nearest eligible actor within `range` of `from`, skipping `exclude`.
///
/// `overlap_sphere` is nearest-first, so the first match wins.
pub fn find_chain_target(
    physics: &impl PhysicsQuery,
    from: Vec3,
    range: f32,
    exclude: &[Entity],
    is_eligible: impl Fn(Entity) -> bool,
) -> Option<Entity> {
    physics
        .overlap_sphere(from, range, COLLISION_LAYER_ACTORS)
        .into_iter()
        .find(|entity| !exclude.contains(entity) && is_eligible(*entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Collider, ColliderWorld};

    #[test]
    fn test_chain_skips_hit_target_and_owner() {
        let owner = Entity::from_raw(1);
        let hit = Entity::from_raw(2);
        let near = Entity::from_raw(3);
        let far = Entity::from_raw(4);

        let mut world = ColliderWorld::default();
        world.insert(owner, Vec3::new(1.0, 0.0, 0.0), Collider::actor(0.5));
        world.insert(hit, Vec3::ZERO, Collider::actor(0.5));
        world.insert(near, Vec3::new(3.0, 0.0, 0.0), Collider::actor(0.5));
        world.insert(far, Vec3::new(6.0, 0.0, 0.0), Collider::actor(0.5));

        let target = find_chain_target(&world, Vec3::ZERO, 8.0, &[hit, owner], |_| true);
        assert_eq!(target, Some(near));

        let target = find_chain_target(&world, Vec3::ZERO, 8.0, &[hit, owner], |e| e != near);
        assert_eq!(target, Some(far));
    }

    #[test]
    fn test_chain_without_candidates() {
        let world = ColliderWorld::default();
        assert_eq!(find_chain_target(&world, Vec3::ZERO, 8.0, &[], |_| true), None);
    }
}
