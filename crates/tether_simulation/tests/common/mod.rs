//! Общие хелперы integration тестов: headless app + игрок на плоском полу

#![allow(dead_code)]

use bevy::prelude::*;
use tether_simulation::locomotion::Jumped;
use tether_simulation::{
    create_headless_app, AnimationTriggers, Animator, CameraRig, CarryCable, GroundPlanePlugin, JumpSounds, Locomotion,
    LocomotionSet, Player, SimulationPlugin, SoundPlayed,
};

/// Записанные события (для проверок после update)
#[derive(Resource, Debug, Default)]
pub struct Recorded {
    pub jumps: Vec<Jumped>,
    pub sounds: Vec<SoundPlayed>,
}

fn record_events(mut jumps: EventReader<Jumped>, mut sounds: EventReader<SoundPlayed>, mut recorded: ResMut<Recorded>) {
    recorded.jumps.extend(jumps.read().copied());
    recorded.sounds.extend(sounds.read().cloned());
}

/// App с симуляцией, ground plane backend и камерой (identity: forward = -Z, right = +X)
pub fn locomotion_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, GroundPlanePlugin))
        .init_resource::<Recorded>()
        .add_systems(FixedUpdate, record_events.after(LocomotionSet::Animate));

    app.world_mut().spawn((CameraRig, Transform::IDENTITY));
    app
}

/// Звуки с шансом 100%, по одному клипу в каждой категории
pub fn test_sounds() -> JumpSounds {
    JumpSounds {
        chance_to_play: 100.0,
        jump: vec!["jump".into()],
        double_jump: vec!["double_jump".into()],
        always_jump: vec!["always_jump".into()],
        always_double_jump: vec!["always_double_jump".into()],
    }
}

pub fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            Locomotion::default(),
            Transform::from_translation(position),
            AnimationTriggers::default(),
            Animator::default(),
            test_sounds(),
            CarryCable::default(),
        ))
        .id()
}

/// `ticks` fixed тиков (первый update app'а только Startup)
pub fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Прогрев: Startup + несколько тиков чтобы игрок встал на пол
pub fn settle(app: &mut App) {
    run(app, 6);
}

pub fn locomotion(app: &App, entity: Entity) -> Locomotion {
    app.world().get::<Locomotion>(entity).cloned().expect("player has Locomotion")
}

pub fn translation(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).expect("player has Transform").translation
}

pub fn recorded(app: &App) -> &Recorded {
    app.world().resource::<Recorded>()
}
