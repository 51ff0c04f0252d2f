//! AI decision-making module
//!
//! Только решение "стрелять/не стрелять" для врагов. Движение и навигация -
//! забота хоста.

use bevy::prelude::*;

pub mod shooter;

// Re-export основных типов
pub use shooter::{enemy_fire_intents, nearest_opponent, EnemyShooter};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate: intents пишутся до того, как
/// combat их обработает в этом же тике.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            enemy_fire_intents
                .after(crate::physics::sync_collider_world)
                .before(crate::combat::systems::process_attack_intents),
        );
    }
}
