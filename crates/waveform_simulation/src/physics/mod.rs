//! Physics query provider
//!
//! Симуляция не двигает тела и не решает контакты - ей нужны только два
//! синхронных запроса без побочных эффектов: ray cast и sphere overlap.
//! `PhysicsQuery` - шов для внешнего physics движка; `ColliderWorld` -
//! встроенная brute-force реализация поверх `Collider` компонентов.
//!
//! ## Layers (битовая маска):
//! - Actors: players/enemies (sphere colliders)
//! - Environment: walls, obstacles (AABB colliders)
//! - Projectiles: никогда не попадают в запросы hitscan/projectile
//! - UI: reticle/interaction volumes, исключены из боевых запросов

use bevy::prelude::*;

pub mod collider_world;

pub use collider_world::{sync_collider_world, ColliderWorld};

/// Layer: Actors (players, NPCs)
pub const COLLISION_LAYER_ACTORS: u32 = 0b10;

/// Layer: Environment (walls, obstacles, terrain)
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100;

/// Layer: Projectiles (traveling waveform bodies)
pub const COLLISION_LAYER_PROJECTILES: u32 = 0b1000;

/// Layer: UI / interaction volumes
pub const COLLISION_LAYER_UI: u32 = 0b10000;

/// Mask: hitscan rays and projectile sweeps see Actors + Environment only
pub const COLLISION_MASK_COMBAT: u32 = COLLISION_LAYER_ACTORS | COLLISION_LAYER_ENVIRONMENT;

/// Получить название слоя для debug логов
pub fn get_layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        COLLISION_LAYER_ACTORS => "Actors",
        COLLISION_LAYER_ENVIRONMENT => "Environment",
        COLLISION_LAYER_PROJECTILES => "Projectiles",
        COLLISION_LAYER_UI => "UI",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ColliderShape {
    Sphere { radius: f32 },
    /// Axis-aligned box
    Box { half_extents: Vec3 },
}

/// Collision volume, centered on the entity's `Transform::translation`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Collider {
    pub shape: ColliderShape,
    pub layer: u32,
}

impl Collider {
    pub fn actor(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere { radius },
            layer: COLLISION_LAYER_ACTORS,
        }
    }

    pub fn wall(half_extents: Vec3) -> Self {
        Self {
            shape: ColliderShape::Box { half_extents },
            layer: COLLISION_LAYER_ENVIRONMENT,
        }
    }

    pub fn is_in(&self, mask: u32) -> bool {
        self.layer & mask != 0
    }
}

/// Nearest ray intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub layer: u32,
}

/// World/physics queries the combat core consumes.
///
/// Both calls are synchronous and side-effect free. Results must be
/// deterministic for identical world state.
pub trait PhysicsQuery {
    /// Nearest hit along `direction` within `max_distance`, ignoring `exclude`.
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
        exclude: Option<Entity>,
    ) -> Option<RayHit>;

    /// Sphere of `radius` swept from `origin` along `direction` for `max_distance`:
    /// every collider it touches, nearest contact first. `RayHit::point` is the
    /// sphere center at contact; a body already overlapping at `origin` is at 0.
    fn sweep_sphere(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        radius: f32,
        mask: u32,
    ) -> Vec<RayHit>;

    /// Colliders touching the sphere, nearest first.
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32) -> Vec<Entity>;

    /// Current position of a queryable body; `None` = gone (stale handle).
    fn position_of(&self, entity: Entity) -> Option<Vec3>;

    fn is_valid(&self, entity: Entity) -> bool {
        self.position_of(entity).is_some()
    }
}
