//! Headless симуляция WAVEFORM
//!
//! Запускает Bevy App без рендера: игрок-бот против трёх стрелков.
//! Используется для проверки детерминизма и баланса.

use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use waveform_simulation::ai::nearest_opponent;
use waveform_simulation::{
    create_headless_app, Actor, CombatConfig, AttackIntent, Collider, CounterEvent, CounterIntent, CounterSystem, DamageDealt,
    Dead, EnemyShooter, EntityDied, EquippedWaveform, Health, Player, SimulationPlugin, WaveformKind,
};

/// Headless waveform combat simulation
#[derive(Parser, Debug)]
#[command(name = "waveform_simulation")]
#[command(about = "Headless waveform arena combat simulation")]
#[command(version)]
struct Args {
    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Number of fixed ticks to simulate
    #[arg(long, default_value = "1000")]
    ticks: u32,

    /// RON config overriding combat constants and waveform table
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,
}

const PLAYER_FACTION: u64 = 1;
const ENEMY_FACTION: u64 = 2;

#[derive(Resource, Debug, Default)]
struct MatchStats {
    hits: u32,
    damage: f32,
    deaths: u32,
    counters: u32,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let plugin = match &args.config {
        Some(path) => match SimulationPlugin::from_config_file(path) {
            Ok(plugin) => plugin,
            Err(err) => {
                eprintln!("Failed to load config {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => SimulationPlugin::default(),
    };

    println!("Starting WAVEFORM headless simulation (seed: {})", args.seed);

    let mut app = create_headless_app(args.seed, plugin);
    app.init_resource::<MatchStats>().add_systems(
        FixedUpdate,
        (
            scripted_player.before(waveform_simulation::combat::systems::process_attack_intents),
            collect_stats.after(waveform_simulation::combat::systems::despawn_after_timeout),
        ),
    );
    spawn_arena(app.world_mut());

    for tick in 0..args.ticks {
        app.update();

        if tick % 100 == 0 {
            let world = app.world_mut();
            let player_health = world
                .query_filtered::<&Health, With<Player>>()
                .iter(world)
                .next()
                .map_or(0.0, |health| health.current);
            let alive = world
                .query_filtered::<&Actor, Without<Dead>>()
                .iter(world)
                .count();
            println!("Tick {}: {} actors alive, player HP {:.1}", tick, alive, player_health);
        }
    }

    let stats = app.world().resource::<MatchStats>();
    println!(
        "Simulation complete! hits: {}, damage: {:.1}, deaths: {}, counters: {}",
        stats.hits, stats.damage, stats.deaths, stats.counters
    );

    ExitCode::SUCCESS
}

fn spawn_arena(world: &mut World) {
    let counter = CounterSystem::from_config(world.resource::<CombatConfig>());
    world.spawn((
        Actor {
            faction_id: PLAYER_FACTION,
        },
        Player,
        EquippedWaveform::new(WaveformKind::Sine),
        counter,
        Collider::actor(0.5),
        Transform::default(),
    ));

    let enemies = [
        (WaveformKind::Sine, Vec3::new(12.0, 0.0, 0.0)),
        (WaveformKind::Square, Vec3::new(-8.0, 0.0, 9.0)),
        (WaveformKind::Sawtooth, Vec3::new(-6.0, 0.0, -10.0)),
    ];
    for (kind, position) in enemies {
        world.spawn((
            Actor {
                faction_id: ENEMY_FACTION,
            },
            EquippedWaveform::new(kind),
            EnemyShooter::default(),
            Collider::actor(0.5),
            Transform::from_translation(position),
        ));
    }

    // Стена между игроком и одним из стрелков
    world.spawn((
        Collider::wall(Vec3::new(0.5, 2.0, 3.0)),
        Transform::from_xyz(-3.0, 0.0, 4.0),
    ));
}

/// Бот игрока: стреляет в ближайшего врага, периодически открывает parry.
fn scripted_player(
    mut tick: Local<u32>,
    players: Query<(Entity, &Actor, &Transform), (With<Player>, Without<Dead>)>,
    targets: Query<(Entity, &Actor, &Transform), Without<Dead>>,
    mut attacks: EventWriter<AttackIntent>,
    mut counters: EventWriter<CounterIntent>,
) {
    *tick += 1;

    for (entity, actor, transform) in players.iter() {
        if *tick % 45 == 0 {
            counters.write(CounterIntent { entity });
        }

        if *tick % 20 != 0 {
            continue;
        }

        let candidates = targets
            .iter()
            .map(|(target, other, target_transform)| (target, other.faction_id, target_transform.translation));
        if let Some((_, target_position)) =
            nearest_opponent(transform.translation, actor.faction_id, f32::INFINITY, candidates)
        {
            attacks.write(AttackIntent {
                attacker: entity,
                origin: transform.translation,
                direction: target_position - transform.translation,
            });
        }
    }
}

fn collect_stats(
    mut stats: ResMut<MatchStats>,
    mut damage: EventReader<DamageDealt>,
    mut deaths: EventReader<EntityDied>,
    mut counters: EventReader<CounterEvent>,
) {
    for event in damage.read() {
        stats.hits += 1;
        stats.damage += event.damage;
    }
    stats.deaths += deaths.read().count() as u32;
    stats.counters += counters
        .read()
        .filter(|event| matches!(event, CounterEvent::Succeeded { .. }))
        .count() as u32;
}
