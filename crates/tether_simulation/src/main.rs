//! Headless симуляция TETHER
//!
//! Два co-op игрока (стрелки / WASD) на плоском полу, скриптованный
//! device input: ходьба, прыжок, double jump. Без рендера и Rapier.

use bevy::prelude::*;
use tether_simulation::{
    create_headless_app, logger, Animator, AnimationTriggers, CameraRig, CarryCable, DeviceState, GroundPlanePlugin,
    InputScheme, JumpSounds, Locomotion, Player, SimulationConfig, SimulationPlugin,
};

const TICKS: u32 = 600;

/// Скрипт: (tick, control path, pressed)
const SCRIPT: &[(u32, &str, bool)] = &[
    // Игрок 1 (Controller1): идёт вправо, прыгает, double jump на спуске
    (30, "<Keyboard>/rightArrow", true),
    (90, "<Keyboard>/space", true),
    (91, "<Keyboard>/space", false),
    (125, "<Keyboard>/space", true),
    (126, "<Keyboard>/space", false),
    (200, "<Keyboard>/rightArrow", false),
    // Игрок 2 (Controller2): вперёд по диагонали
    (60, "<Keyboard>/w", true),
    (60, "<Keyboard>/a", true),
    (300, "<Keyboard>/w", false),
    (300, "<Keyboard>/a", false),
];

fn spawn_player(commands: &mut Commands, config: &SimulationConfig, scheme: &str, position: Vec3) -> Entity {
    commands
        .spawn((
            Name::new(format!("Player ({})", scheme)),
            Player,
            Locomotion::new(config.locomotion),
            Transform::from_translation(position),
            AnimationTriggers::default(),
            Animator::default(),
            config.jump_sounds.clone(),
            CarryCable::default(),
            InputScheme::new(scheme),
        ))
        .id()
}

fn setup(mut commands: Commands, config: Res<SimulationConfig>) {
    // Камера сзади-сверху, смотрит на -Z
    commands.spawn((
        CameraRig,
        Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    spawn_player(&mut commands, &config, "Controller1", Vec3::new(-2.0, 0.0, 0.0));
    spawn_player(&mut commands, &config, "Controller2", Vec3::new(2.0, 0.0, 0.0));
}

fn main() {
    let seed = 42;
    let mut app = create_headless_app(seed);
    logger::log_info(&format!("Starting TETHER headless simulation (seed: {})", seed));

    let config = SimulationConfig {
        seed,
        jump_sounds: JumpSounds {
            jump: vec!["jump_a".into(), "jump_b".into()],
            double_jump: vec!["double_jump".into()],
            always_jump: vec!["grunt".into()],
            ..default()
        },
        ..default()
    };

    app.insert_resource(config)
        .add_plugins((SimulationPlugin, GroundPlanePlugin))
        .add_systems(Startup, setup);

    // Первый update: Startup (fixed время ещё не идёт)
    app.update();

    for tick in 0..TICKS {
        {
            let mut devices = app.world_mut().resource_mut::<DeviceState>();
            for &(at, path, pressed) in SCRIPT {
                if at != tick {
                    continue;
                }
                if pressed {
                    devices.press(path);
                } else {
                    devices.release(path);
                }
            }
        }

        app.update();

        if tick % 60 == 0 {
            let world = app.world_mut();
            let mut players = world.query::<(&Name, &Transform, &Locomotion, &Animator)>();
            for (name, transform, locomotion, animator) in players.iter(world) {
                logger::log_info(&format!(
                    "Tick {}: {} at {:.2?}, velocity.y {:.2}, grounded {}, {:?}",
                    tick,
                    name,
                    transform.translation,
                    locomotion.state.velocity.y,
                    locomotion.player_grounded(),
                    animator.state
                ));
            }
        }
    }

    logger::log_info("Simulation complete!");
}
