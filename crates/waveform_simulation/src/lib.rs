//! WAVEFORM Simulation Core
//!
//! ECS-симуляция боя на Bevy 0.16: ресурсы акторов и damage pipeline,
//! снаряды/hitscan с homing и chain, counter (parry) с баффами.
//!
//! Хост (presentation layer) шлёт intents (`AttackIntent`, `CounterIntent`,
//! `WaveformHit`) и читает notifications (`ResourceChanged`, `DamageDealt`,
//! `CounterEvent`, ...). Мир для ядра - `PhysicsQuery`.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod counter;
pub mod logger;
pub mod physics;
pub mod projectile;
pub mod waveform;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, EnemyShooter};
pub use combat::{
    AttackIntent, CombatPlugin, DamageDealt, Dead, DecalRequested, DespawnAfter, EntityDied, HitOutcome, HitSource,
    HitscanTraced, KnockbackApplied, ProjectileSpawned, ResourceChanged, ResourceKind, StatusEffectAdded,
    WaveformHit,
};
pub use components::*;
pub use config::{CombatConfig, ConfigError, SimulationConfig};
pub use counter::{CounterEvent, CounterIntent, CounterSystem};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use physics::{Collider, ColliderWorld, PhysicsQuery};
pub use projectile::WaveformProjectile;
pub use waveform::{WaveformKind, WaveformLibrary, WaveformType};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Конфигурация передаётся явно; `SimulationPlugin::default()` - shipped tuning.
#[derive(Default)]
pub struct SimulationPlugin {
    pub combat: CombatConfig,
    pub library: WaveformLibrary,
}

impl SimulationPlugin {
    pub fn with_config(combat: CombatConfig, library: WaveformLibrary) -> Self {
        Self { combat, library }
    }

    /// Loads and validates a RON configuration document.
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let (combat, library) = SimulationConfig::load_from_file(path)?.into_resources()?;
        Ok(Self::with_config(combat, library))
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(self.combat.tick_hz))
            .insert_resource(self.combat.clone())
            .insert_resource(self.library.clone())
            // Подсистемы
            .add_plugins((CombatPlugin, AIPlugin));

        // Детерминистичный RNG (seed по умолчанию, если хост не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` продвигает время ровно на один fixed tick, так что
/// FixedUpdate срабатывает один раз за update (кроме самого первого, с Δt = 0).
pub fn create_headless_app(seed: u64, plugin: SimulationPlugin) -> App {
    let mut app = App::new();
    init_logger();

    let tick = std::time::Duration::from_secs_f64(1.0 / plugin.combat.tick_hz);
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(plugin)
        .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(tick));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
