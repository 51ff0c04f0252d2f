//! Counter events: input intent (→ ECS) and notifications (ECS → presentation).

use bevy::prelude::*;

use crate::waveform::WaveformKind;

/// Event: игрок нажал parry
#[derive(Event, Debug, Clone)]
pub struct CounterIntent {
    pub entity: Entity,
}

/// Counter notifications for presentation (animation/VFX/UI).
#[derive(Event, Debug, Clone, PartialEq)]
pub enum CounterEvent {
    /// Parry window opened
    WindowStarted { entity: Entity },

    /// An incoming attack was intercepted and converted into a buff
    Succeeded {
        entity: Entity,
        attacker: Entity,
        waveform: WaveformKind,
        stacks: u32,
        /// Chromatic Saturation fired on this counter
        saturated: bool,
    },

    /// Window closed (expired or cancelled)
    WindowEnded {
        entity: Entity,
        successes: u32,
        cooldown_started: bool,
    },

    /// Cooldown over, parry available again
    CooldownFinished { entity: Entity },
}
