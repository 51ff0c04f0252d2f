//! Per-tick resource upkeep: energy regen, status expiry, ramp decay.

use bevy::prelude::*;

use crate::combat::damage::Dead;
use crate::combat::events::{ResourceChanged, ResourceKind};
use crate::components::{Energy, HitRampTracker, RampStacks, StatusEffectKind, StatusEffects};
use crate::counter::CounterSystem;

/// Energy regen multiplier from every live source (status × counter buff).
pub fn energy_regen_multiplier(statuses: &StatusEffects, counter: Option<&CounterSystem>) -> f32 {
    let status = statuses.strength_or(StatusEffectKind::EnergyRegenBoost, 1.0);
    let counter = counter.map_or(1.0, CounterSystem::energy_regen_multiplier);
    status * counter
}

/// System: регенерация energy (`regen_rate × multiplier × Δt`, clamp к max)
pub fn regenerate_energy(
    mut actors: Query<(Entity, &mut Energy, &StatusEffects, Option<&CounterSystem>), Without<Dead>>,
    mut resource_events: EventWriter<ResourceChanged>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut energy, statuses, counter) in actors.iter_mut() {
        if energy.current >= energy.max {
            continue;
        }

        let gained = energy.regenerate(delta, energy_regen_multiplier(statuses, counter));
        if gained > 0.0 {
            resource_events.write(ResourceChanged {
                entity,
                resource: ResourceKind::Energy,
                current: energy.current,
                max: energy.max,
            });
        }
    }
}

/// System: истечение статус-эффектов
pub fn tick_status_effects(mut query: Query<(Entity, &mut StatusEffects)>, time: Res<Time>) {
    let delta = time.delta_secs();

    for (entity, mut statuses) in query.iter_mut() {
        if statuses.is_empty() {
            continue;
        }
        for kind in statuses.tick(delta) {
            crate::logger::log(&format!("⌛ {:?} expired on {:?}", kind, entity));
        }
    }
}

/// System: распад outgoing ramp стеков + чистка incoming hit ramp
pub fn tick_damage_ramps(mut query: Query<(&mut RampStacks, &mut HitRampTracker)>, time: Res<Time>) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    for (mut ramp, mut hit_ramps) in query.iter_mut() {
        ramp.tick(delta);
        if !hit_ramps.is_empty() {
            hit_ramps.prune(now);
        }
    }
}
