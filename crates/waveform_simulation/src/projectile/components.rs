//! WaveformProjectile - traveling attack body, fully simulated in ECS

use bevy::prelude::*;

use crate::waveform::WaveformKind;

/// Homing state. `target` is a weak handle: re-validated every tick, dropped when stale.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct HomingState {
    pub target: Option<Entity>,
    /// Max turn rate (degrees per second)
    pub strength: f32,
    /// Retention range (m)
    pub range: f32,
}

/// Снаряд waveform
///
/// Позиция - `Transform::translation`. Уничтожается при попадании, при
/// попадании в геометрию или по истечении lifetime.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct WaveformProjectile {
    /// Кто выстрелил (self-hit prevention + damage attribution)
    pub owner: Entity,

    /// Фракция стрелка на момент выстрела (снаряд переживает владельца)
    pub owner_faction: u64,

    pub waveform: WaveformKind,

    /// Урон, посчитанный при выстреле
    pub damage: f32,

    /// Текущая скорость (direction × speed)
    pub velocity: Vec3,

    /// Модуль скорости (м/с), сохраняется при steering
    pub speed: f32,

    /// Collision sphere radius (m)
    pub radius: f32,

    /// Оставшееся время жизни (секунды)
    pub lifetime: f32,

    pub homing: Option<HomingState>,

    /// Chain on hit: search range for the single secondary projectile
    pub chain_range: Option<f32>,

    /// This projectile is itself a chain (never chains again)
    pub chained: bool,

    /// Пролетает сквозь эту цель (chain стартует внутри уже поражённой цели)
    pub ignore: Option<Entity>,
}

impl WaveformProjectile {
    pub fn direction(&self) -> Vec3 {
        self.velocity.normalize_or_zero()
    }

    pub fn homing_target(&self) -> Option<Entity> {
        self.homing.and_then(|homing| homing.target)
    }
}
