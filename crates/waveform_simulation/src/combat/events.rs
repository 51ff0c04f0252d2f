//! Combat events
//!
//! Input (host/AI → ECS): AttackIntent, WaveformHit
//! Notifications (ECS → presentation): ResourceChanged, DamageDealt, EntityDied,
//! StatusEffectAdded, KnockbackApplied, DecalRequested, HitscanTraced, ProjectileSpawned

use bevy::prelude::*;

use crate::components::StatusEffectKind;
use crate::waveform::WaveformKind;

/// Event: актёр хочет атаковать экипированным waveform
///
/// `origin` - spawn point оружия, `direction` - направление прицела.
#[derive(Event, Debug, Clone)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Откуда пришёл удар
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum HitSource {
    Projectile,
    /// Secondary projectile spawned by a chain attack
    Chain,
    Hitscan,
    /// Bounced back by a reflect buff (never reflected again)
    Reflected,
    /// Hits injected by the host (melee, hazards)
    External,
}

/// Event: удар по цели, который ещё предстоит разрешить (counter → immunity → damage)
#[derive(Event, Debug, Clone)]
pub struct WaveformHit {
    pub attacker: Entity,
    pub target: Entity,
    pub waveform: WaveformKind,
    pub amount: f32,
    pub source: HitSource,
    /// Direction of travel at impact (knockback direction)
    pub direction: Vec3,
    pub impact_point: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ResourceKind {
    Health,
    Energy,
}

/// Event: health/energy изменились (для HUD)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ResourceChanged {
    pub entity: Entity,
    pub resource: ResourceKind,
    pub current: f32,
    pub max: f32,
}

/// Event: урон нанесен (hit-occurred для звуков/эффектов)
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub waveform: WaveformKind,
    pub damage: f32,
    pub source: HitSource,
    pub impact_point: Vec3,
    pub target_died: bool,
}

/// Event: entity умер (health reached 0), ровно один раз на entity
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

#[derive(Event, Debug, Clone)]
pub struct StatusEffectAdded {
    pub entity: Entity,
    pub kind: StatusEffectKind,
    pub strength: f32,
    pub duration: f32,
}

/// Event: импульс отбрасывания для physics layer
#[derive(Event, Debug, Clone)]
pub struct KnockbackApplied {
    pub entity: Entity,
    pub impulse: Vec3,
}

/// Event: презентации нужен декаль в точке попадания по геометрии
#[derive(Event, Debug, Clone)]
pub struct DecalRequested {
    pub point: Vec3,
    pub normal: Vec3,
    pub waveform: WaveformKind,
}

/// Event: hitscan трассер (visual trail), эмитится даже если удар законтрили
#[derive(Event, Debug, Clone)]
pub struct HitscanTraced {
    pub shooter: Entity,
    pub waveform: WaveformKind,
    pub origin: Vec3,
    pub end: Vec3,
    pub hit: Option<Entity>,
}

/// Event: projectile body создан (spawner/presentation attach visuals)
#[derive(Event, Debug, Clone)]
pub struct ProjectileSpawned {
    pub projectile: Entity,
    pub owner: Entity,
    pub waveform: WaveformKind,
    pub position: Vec3,
    pub chained: bool,
}
