//! Homing math (pure functions)
//!
//! - Acquisition (once, at spawn): best `angle × 2 + distance` inside the
//!   acquisition cone around the aim direction.
//! - Retention (every tick): target alive, in range, inside the retention
//!   cone around the current velocity.
//! - Steering: rotate velocity by at most `strength × Δt` degrees.

use bevy::prelude::*;

/// Угол между векторами в градусах (0 для нулевых векторов)
pub fn angle_deg(a: Vec3, b: Vec3) -> f32 {
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.angle_between(b).to_degrees()
}

/// Score кандидата: меньше - лучше
pub fn target_score(angle_deg: f32, distance: f32) -> f32 {
    angle_deg * 2.0 + distance
}

/// Picks the best-scoring candidate. Cone is a half-angle in degrees.
///
/// Ties keep the earlier candidate; callers pass candidates in a stable order.
pub fn acquire_target(
    origin: Vec3,
    aim: Vec3,
    range: f32,
    cone_deg: f32,
    candidates: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Option<Entity> {
    let mut best: Option<(f32, Entity)> = None;

    for (entity, position) in candidates {
        let offset = position - origin;
        let distance = offset.length();
        if distance > range {
            continue;
        }

        let angle = angle_deg(aim, offset);
        if angle > cone_deg {
            continue;
        }

        let score = target_score(angle, distance);
        if best.is_none_or(|(best_score, _)| score < best_score) {
            best = Some((score, entity));
        }
    }

    best.map(|(_, entity)| entity)
}

/// `target_position = None` - цель исчезла (stale handle).
pub fn target_still_valid(
    position: Vec3,
    velocity: Vec3,
    target_position: Option<Vec3>,
    range: f32,
    cone_deg: f32,
) -> bool {
    let Some(target_position) = target_position else {
        return false;
    };

    let offset = target_position - position;
    offset.length() <= range && angle_deg(velocity, offset) <= cone_deg
}

/// Rotates `velocity` toward `target_position` by at most `strength_deg × delta`
/// degrees and renormalizes to `speed`.
pub fn steer_velocity(
    velocity: Vec3,
    position: Vec3,
    target_position: Vec3,
    strength_deg: f32,
    delta: f32,
    speed: f32,
) -> Vec3 {
    let desired = (target_position - position).normalize_or_zero();
    let current = velocity.normalize_or_zero();
    if desired == Vec3::ZERO || current == Vec3::ZERO {
        return velocity;
    }

    let angle = current.angle_between(desired);
    let max_turn = (strength_deg.max(0.0) * delta).to_radians();
    if angle <= max_turn {
        return desired * speed;
    }

    let mut axis = current.cross(desired);
    if axis.length_squared() < 1e-8 {
        // цель ровно позади: любая перпендикулярная ось
        axis = current.any_orthonormal_vector();
    }

    let rotated = Quat::from_axis_angle(axis.normalize(), max_turn) * current;
    rotated.normalize_or(current) * speed
}
