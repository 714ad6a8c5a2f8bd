//! Integration тесты Rapier backend (headless, Rapier step в FixedPostUpdate)
//!
//! Пол - статичный cuboid, игроки - player_body (KinematicCharacterController).

mod common;

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::*;
use common::*;
use tether_simulation::locomotion::{slope_angle_degrees, steep_slide_direction, GroundProbeSample, GroundSensor, MovementInputEvent};
use tether_simulation::physics::{environment_groups, player_body};
use tether_simulation::{
    create_headless_app, CameraRig, LocomotionConfig, RapierLocomotionPlugin, SimulationPlugin, SIMULATION_HZ,
};

fn rapier_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins((bevy::transform::TransformPlugin, SimulationPlugin, RapierLocomotionPlugin));
    app.world_mut().spawn((CameraRig, Transform::IDENTITY));
    app
}

/// Пол: верхняя грань на y = 0
fn spawn_floor(app: &mut App) {
    app.world_mut().spawn((
        Collider::cuboid(50.0, 0.5, 50.0),
        Transform::from_xyz(0.0, -0.5, 0.0),
        environment_groups(),
    ));
}

fn spawn_rapier_player(app: &mut App, position: Vec3) -> Entity {
    let player = spawn_player(app, position);
    app.world_mut()
        .entity_mut(player)
        .insert(player_body(&LocomotionConfig::default()));
    player
}

fn probe_sample(app: &App, entity: Entity) -> GroundProbeSample {
    *app.world().get::<GroundProbeSample>(entity).expect("player has GroundProbeSample")
}

/// Сколько fixed tick укладывается в один app.update()
fn set_ticks_per_frame(app: &mut App, ticks: u32) {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        ticks as f64 / SIMULATION_HZ,
    )));
}

#[test]
fn test_player_settles_on_floor() {
    let mut app = rapier_app(1);
    spawn_floor(&mut app);
    let player = spawn_rapier_player(&mut app, Vec3::new(0.0, 0.3, 0.0));

    run(&mut app, 40);

    let position = translation(&app, player);
    assert!(position.y >= -0.01 && position.y < 0.05, "y = {}", position.y);
    assert!(app.world().get::<GroundSensor>(player).unwrap().grounded);

    let locomotion = locomotion(&app, player);
    assert!(locomotion.player_grounded());
    assert!(!locomotion.is_sliding());
    assert!(locomotion.state.velocity.y < 0.0);
}

/// Пройденное по X за `frames` кадров при `ticks_per_frame` tick на кадр
fn walk_distance(ticks_per_frame: u32, frames: usize) -> f32 {
    let mut app = rapier_app(2);
    spawn_floor(&mut app);
    let player = spawn_rapier_player(&mut app, Vec3::new(0.0, 0.05, 0.0));
    run(&mut app, 20);

    let start = translation(&app, player);
    set_ticks_per_frame(&mut app, ticks_per_frame);
    app.world_mut()
        .send_event(MovementInputEvent { entity: player, value: Vec2::X });
    run(&mut app, frames);

    translation(&app, player).x - start.x
}

#[test]
fn test_walk_keeps_every_tick_displacement() {
    // speed 2 m/s, 30 кадров
    let single = walk_distance(1, 30);
    let double = walk_distance(2, 30);

    assert!((single - 1.0).abs() < 0.05, "1 tick/frame: dx = {}", single);
    assert!((double - 2.0).abs() < 0.1, "2 ticks/frame: dx = {}", double);
}

#[test]
fn test_ground_ray_reports_steep_slope() {
    let mut app = rapier_app(3);
    // Плита под 60° вокруг Z, над центром верхняя грань на y = 1
    app.world_mut().spawn((
        Collider::cuboid(5.0, 0.5, 5.0),
        Transform::from_rotation(Quat::from_rotation_z(60f32.to_radians())),
        environment_groups(),
    ));
    let player = spawn_rapier_player(&mut app, Vec3::new(0.0, 4.0, 0.0));

    run(&mut app, 5);

    let hit = probe_sample(&app, player).hit.expect("probe hits the slab");
    assert!((slope_angle_degrees(hit.normal) - 60.0).abs() < 0.5, "normal = {:?}", hit.normal);
    assert!(hit.distance > 2.5);

    let config = LocomotionConfig::default();
    let slide = steep_slide_direction(hit.normal, config.slope_limit).expect("60° is steeper than the limit");
    // Нормаль смотрит в -X
    assert!(slide.x > 0.0);
}

#[test]
fn test_ground_ray_ignores_other_players() {
    let mut app = rapier_app(4);
    spawn_floor(&mut app);
    spawn_rapier_player(&mut app, Vec3::new(0.0, 0.05, 0.0));
    let upper = spawn_rapier_player(&mut app, Vec3::new(0.0, 2.5, 0.0));

    run(&mut app, 4);

    // Ray проходит сквозь capsule нижнего игрока до пола
    let hit = probe_sample(&app, upper).hit.expect("probe hits the floor");
    assert_eq!(slope_angle_degrees(hit.normal).round(), 0.0);
    assert!(hit.distance > 2.0, "distance = {}", hit.distance);
}

#[test]
fn test_stacked_player_slides_off() {
    let mut app = rapier_app(5);
    spawn_floor(&mut app);
    let lower = spawn_rapier_player(&mut app, Vec3::new(0.0, 0.05, 0.0));
    let upper = spawn_rapier_player(&mut app, Vec3::new(0.2, 2.3, 0.0));
    run(&mut app, 1);

    let mut stacked_ticks = 0;
    for _ in 0..360 {
        app.update();
        if locomotion(&app, upper).state.above_other_player_last_frame {
            stacked_ticks += 1;
        }
    }

    // Стоял на голове (прыжок заблокирован), потом спихнуло
    assert!(stacked_ticks > 0);

    let lower_position = translation(&app, lower);
    let upper_position = translation(&app, upper);
    let horizontal = Vec2::new(upper_position.x - lower_position.x, upper_position.z - lower_position.z);
    assert!(horizontal.length() >= 0.95, "upper = {:?}", upper_position);
    assert!(upper_position.y < 0.3, "upper = {:?}", upper_position);
    assert!(lower_position.y < 0.05);

    let upper_state = locomotion(&app, upper);
    assert!(!upper_state.state.above_other_player_last_frame);
    assert!(upper_state.player_grounded());
}
