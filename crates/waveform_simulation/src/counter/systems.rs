//! Counter systems: window activation and per-tick timers.
//!
//! Counter *resolution* happens inside damage application
//! (`combat::systems::damage::DamageContext`), synchronously with the hit.

use bevy::prelude::*;

use super::components::{CounterPhaseChange, CounterSystem};
use super::events::{CounterEvent, CounterIntent};
use crate::combat::{ResourceChanged, ResourceKind};
use crate::components::Health;

/// System: открыть parry window по CounterIntent
///
/// Игнорируется, если окно уже открыто, идёт cooldown или актор мёртв.
pub fn start_counter_windows(
    mut intents: EventReader<CounterIntent>,
    mut counters: Query<(&mut CounterSystem, &Health)>,
    mut counter_events: EventWriter<CounterEvent>,
) {
    for intent in intents.read() {
        let Ok((mut counter, health)) = counters.get_mut(intent.entity) else {
            crate::logger::log_warning(&format!(
                "CounterIntent for {:?} without CounterSystem (ignored)",
                intent.entity
            ));
            continue;
        };

        if !health.is_alive() {
            continue;
        }

        if !counter.try_open_window() {
            crate::logger::log(&format!(
                "🛡️ Counter not available for {:?} (phase: {:?})",
                intent.entity, counter.phase
            ));
            continue;
        }

        counter_events.write(CounterEvent::WindowStarted { entity: intent.entity });
        crate::logger::log(&format!(
            "🛡️ Counter window opened (entity: {:?}, {:.2}s)",
            intent.entity, counter.window_duration
        ));
    }
}

/// System: window/cooldown таймеры + истечение баффов + regeneration aura
pub fn tick_counter_systems(
    mut counters: Query<(Entity, &mut CounterSystem, &mut Health)>,
    mut counter_events: EventWriter<CounterEvent>,
    mut resource_events: EventWriter<ResourceChanged>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut counter, mut health) in counters.iter_mut() {
        let tick = counter.tick(delta);

        match tick.phase_change {
            Some(CounterPhaseChange::WindowEnded {
                successes,
                cooldown_started,
            }) => {
                counter_events.write(CounterEvent::WindowEnded {
                    entity,
                    successes,
                    cooldown_started,
                });
                if cooldown_started {
                    crate::logger::log(&format!(
                        "⏱️ Counter window missed → cooldown {:.1}s (entity: {:?})",
                        counter.cooldown_duration, entity
                    ));
                }
            }
            Some(CounterPhaseChange::CooldownFinished) => {
                counter_events.write(CounterEvent::CooldownFinished { entity });
            }
            None => {}
        }

        if tick.regen_heal > 0.0 && health.heal(tick.regen_heal) > 0.0 {
            resource_events.write(ResourceChanged {
                entity,
                resource: ResourceKind::Health,
                current: health.current,
                max: health.max,
            });
        }
    }
}
