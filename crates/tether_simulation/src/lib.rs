//! TETHER Simulation Core
//!
//! Third-person co-op локомоция на Bevy 0.16:
//! - locomotion: coyote time, jump/double jump, slope slide, стакинг игроков
//! - input: action asset + control schemes (два игрока на одной клавиатуре)
//! - physics: headless ground plane или Rapier KinematicCharacterController
//! - hint: текстовые подсказки над объектами
//!
//! Controller (locomotion::Locomotion) - чистый Rust без ECS, все
//! коллабораторы передаются явно; ECS системы только собирают их из мира.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod audio;
pub mod components;
pub mod config;
pub mod error;
pub mod hint;
pub mod input;
pub mod locomotion;
pub mod logger;
pub mod physics;

// Re-export базовых типов для удобства
pub use components::*;
pub use config::{HintConfig, LocomotionConfig, SimulationConfig};
pub use error::ConfigError;
pub use hint::{HintCommand, HintPlugin, InteractionHint};
pub use input::{DeviceState, InputScheme, PlayerInputPlugin};
pub use locomotion::{Locomotion, LocomotionPlugin, LocomotionSet};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{GroundPlane, GroundPlanePlugin, RapierLocomotionPlugin};

/// Частота simulation tick
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Physics backend НЕ входит: хост добавляет GroundPlanePlugin
/// (headless) или RapierLocomotionPlugin (он же поднимает Rapier в fixed schedule).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>();

        // Seed из конфига, если хост не поставил RNG сам
        if !app.world().contains_resource::<DeterministicRng>() {
            let seed = app.world().resource::<SimulationConfig>().seed;
            app.insert_resource(DeterministicRng::new(seed));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .add_plugins((LocomotionPlugin, PlayerInputPlugin, HintPlugin));
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
/// Время ручное: каждый `app.update()` = ровно один fixed tick
/// (первый update только запускает Startup, время ещё не идёт).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
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
