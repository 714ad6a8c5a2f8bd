//! Rapier physics backend
//!
//! - Slope probe: ray вниз через RapierContext (слой игроков исключён)
//! - Перемещение: KinematicCharacterController.translation += displacement
//! - grounded + контакты: из KinematicCharacterControllerOutput
//! - Игрок-игрок: нормаль стакинга считается по геометрии capsule,
//!   пересечения capsule разводятся до Sense
//!
//! RapierPhysicsPlugin крутится в FixedPostUpdate: после каждого tick
//! ровно один physics step, Sense следующего tick читает его output.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::collision;
use crate::components::Player;
use crate::config::LocomotionConfig;
use crate::locomotion::{
    GroundContact, GroundContactEvent, GroundProbe, GroundProbeSample, GroundSensor, Locomotion, LocomotionSet,
    PendingDisplacement, ProbeHit, ProbeRay,
};
use crate::logger;

/// Половина цилиндрической части capsule (m)
pub const CAPSULE_HALF_HEIGHT: f32 = 0.5;

/// Зазор после разведения пересекающихся capsule (m)
pub const SEPARATION_SKIN: f32 = 0.01;

/// GroundProbe поверх RapierContext
pub struct RapierGroundProbe<'a> {
    pub context: &'a RapierContext<'a>,
}

impl GroundProbe for RapierGroundProbe<'_> {
    /// Ray вместо sphere cast: нужна только нормаль, дистанцию
    /// компенсируем радиусом
    fn cast(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32) -> Option<ProbeHit> {
        let filter = QueryFilter::default().groups(collision::ground_probe_groups());
        let (_, intersection) =
            self.context
                .cast_ray_and_get_normal(origin, direction, max_distance + radius, true, filter)?;

        Some(ProbeHit {
            normal: intersection.normal,
            distance: (intersection.time_of_impact - radius).max(0.0),
        })
    }
}

/// Ось capsule игрока (центры нижней и верхней полусфер)
///
/// `base` - Transform entity (основание, collider смещён вверх).
pub fn capsule_axis(base: Vec3, radius: f32) -> (Vec3, Vec3) {
    let bottom = base + Vec3::new(0.0, radius, 0.0);
    (bottom, bottom + Vec3::new(0.0, 2.0 * CAPSULE_HALF_HEIGHT, 0.0))
}

/// Ближайшие точки двух вертикальных осей capsule (a, b)
pub fn closest_axis_points(a_base: Vec3, a_radius: f32, b_base: Vec3, b_radius: f32) -> (Vec3, Vec3) {
    let (a_bottom, a_top) = capsule_axis(a_base, a_radius);
    let (b_bottom, b_top) = capsule_axis(b_base, b_radius);

    let low = a_bottom.y.max(b_bottom.y);
    let high = a_top.y.min(b_top.y);
    if low <= high {
        // Оси перекрываются по высоте - стоят бок о бок
        let y = (low + high) * 0.5;
        (Vec3::new(a_base.x, y, a_base.z), Vec3::new(b_base.x, y, b_base.z))
    } else if a_bottom.y > b_top.y {
        (a_bottom, b_top)
    } else {
        (a_top, b_bottom)
    }
}

/// Контакт KCC с окружением
///
/// `normal1` смотрит от персонажа к препятствию, нам нужна нормаль поверхности.
pub fn environment_contact(normal1: Vec3) -> GroundContact {
    GroundContact {
        normal: -normal1,
        other_is_player: false,
        other_vertical_offset: 0.0,
    }
}

/// Контакт с другим игроком: нормаль от его оси к нашей
///
/// Нормаль KCC при касании почти вертикальных capsule шумит (и вырождается
/// при пересечении), а геометрия обоих тел известна точно.
pub fn player_contact(own_base: Vec3, own_radius: f32, other_base: Vec3, other_radius: f32) -> GroundContact {
    let (own, other) = closest_axis_points(own_base, own_radius, other_base, other_radius);
    GroundContact {
        normal: (own - other).normalize_or(Vec3::Y),
        other_is_player: true,
        other_vertical_offset: other_base.y - own_base.y,
    }
}

/// Разводит пересекающиеся capsule игроков
///
/// KCC не выталкивает из уже существующего пересечения: каждый cast
/// упирается в toi = 0 и персонаж замирает. Выталкиваем верхнего
/// (при равной высоте - первого из пары) вдоль линии между осями.
pub fn separate_overlapping_players(
    mut players: Query<(Entity, &Locomotion, &mut Transform), With<KinematicCharacterController>>,
) {
    let mut pairs = players.iter_combinations_mut();
    while let Some([(a_entity, a_locomotion, mut a), (b_entity, b_locomotion, mut b)]) = pairs.fetch_next() {
        let a_radius = a_locomotion.config.radius;
        let b_radius = b_locomotion.config.radius;
        let (a_point, b_point) = closest_axis_points(a.translation, a_radius, b.translation, b_radius);

        let delta = a_point - b_point;
        let depth = a_radius + b_radius - delta.length();
        if depth <= 0.0 {
            continue;
        }

        let push = delta.normalize_or(Vec3::Y) * (depth + SEPARATION_SKIN);
        if a.translation.y >= b.translation.y {
            a.translation += push;
        } else {
            b.translation -= push;
        }
        logger::log_warning(&format!(
            "Players {:?} and {:?} overlapped by {:.3}, separated",
            a_entity, b_entity, depth
        ));
    }
}

/// Sense: probe + grounded + контакты последнего перемещения
///
/// Контакты пишем только по свежему output (после нового physics step),
/// иначе два tick без step между ними получили бы одни и те же контакты.
pub fn sense_rapier_ground(
    rapier: ReadRapierContext,
    mut players: Query<(
        Entity,
        &Locomotion,
        &Transform,
        &mut GroundSensor,
        &mut GroundProbeSample,
        Option<Ref<KinematicCharacterControllerOutput>>,
    )>,
    bodies: Query<(&Transform, Option<&Locomotion>), With<Player>>,
    mut contacts: EventWriter<GroundContactEvent>,
) -> Result {
    let context = rapier.single()?;
    let probe = RapierGroundProbe { context: &context };

    for (entity, locomotion, transform, mut sensor, mut sample, output) in players.iter_mut() {
        let position = transform.translation;
        let radius = locomotion.config.radius;
        *sample = GroundProbeSample::record(ProbeRay::below(position, &locomotion.config), &probe);

        let Some(output) = output else {
            sensor.grounded = false;
            continue;
        };
        if !output.is_changed() {
            continue;
        }
        sensor.grounded = output.grounded;

        for collision in &output.collisions {
            let contact = match bodies.get(collision.entity) {
                Ok((other, other_locomotion)) => {
                    let other_radius = other_locomotion.map_or(radius, |other| other.config.radius);
                    player_contact(position, radius, other.translation, other_radius)
                }
                Err(_) => {
                    let Some(details) = collision.hit.details.as_ref() else {
                        continue;
                    };
                    environment_contact(details.normal1)
                }
            };

            contacts.write(GroundContactEvent { entity, contact });
        }
    }

    Ok(())
}

/// Apply: PendingDisplacement → KCC (Rapier двигает в своём step)
///
/// Накапливаем: если хост крутит Rapier реже, чем tick (PostUpdate при
/// нескольких tick за кадр), step применит сумму, а не последний tick.
pub fn apply_displacement_rapier(
    mut players: Query<(&mut KinematicCharacterController, &mut PendingDisplacement), With<Locomotion>>,
) {
    for (mut controller, mut pending) in players.iter_mut() {
        let queued = controller.translation.unwrap_or(Vec3::ZERO);
        controller.translation = Some(queued + pending.0);
        pending.0 = Vec3::ZERO;
    }
}

/// Физическое тело игрока
///
/// Collider смещён вверх: Transform entity = основание персонажа
/// (probe origin и offset стакинга считаются от ног).
/// Snap to ground выключен: прижимает к земле сам controller (grounded bias).
pub fn player_body(config: &LocomotionConfig) -> impl Bundle {
    let center = Vec3::new(0.0, CAPSULE_HALF_HEIGHT + config.radius, 0.0);

    (
        RigidBody::KinematicPositionBased,
        Collider::compound(vec![(
            center,
            Quat::IDENTITY,
            Collider::capsule_y(CAPSULE_HALF_HEIGHT, config.radius),
        )]),
        KinematicCharacterController {
            up: Vec3::Y,
            max_slope_climb_angle: config.slope_limit.to_radians(),
            slide: true,
            snap_to_ground: None,
            autostep: None,
            filter_groups: Some(collision::player_groups()),
            ..default()
        },
        collision::player_groups(),
    )
}

/// Rapier backend plugin
///
/// Сам добавляет RapierPhysicsPlugin в fixed schedule (один step на tick).
/// Если хост уже добавил свой (например в PostUpdate), displacement
/// копится до его step.
pub struct RapierLocomotionPlugin;

impl Plugin for RapierLocomotionPlugin {
    fn build(&self, app: &mut App) {
        if app.is_plugin_added::<RapierPhysicsPlugin<NoUserData>>() {
            logger::log_warning("RapierPhysicsPlugin added by host: physics step may run less often than locomotion tick");
        } else {
            app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule());
        }

        app.add_systems(
            FixedUpdate,
            (
                (separate_overlapping_players, sense_rapier_ground)
                    .chain()
                    .in_set(LocomotionSet::Sense),
                apply_displacement_rapier.in_set(LocomotionSet::Apply),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_normal_points_away_from_surface() {
        // Персонаж стоит на полу: normal1 (на capsule) смотрит вниз
        let contact = environment_contact(Vec3::NEG_Y);
        assert_eq!(contact.normal, Vec3::Y);
        assert!(!contact.other_is_player);
        assert_eq!(contact.other_vertical_offset, 0.0);
    }

    #[test]
    fn test_player_contact_from_above() {
        // Стоим на голове со смещением по X: нормаль наклонена к нам
        let contact = player_contact(Vec3::new(0.2, 2.0, 0.0), 0.5, Vec3::ZERO, 0.5);

        assert!(contact.other_is_player);
        assert_eq!(contact.other_vertical_offset, -2.0);
        assert!((contact.normal - Vec3::new(0.2, 1.0, 0.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn test_player_contact_side_by_side_is_horizontal() {
        let contact = player_contact(Vec3::new(-1.0, 0.0, 0.0), 0.5, Vec3::ZERO, 0.5);
        assert_eq!(contact.normal, Vec3::NEG_X);
        assert_eq!(contact.other_vertical_offset, 0.0);
    }

    #[test]
    fn test_player_contact_exactly_above_is_vertical() {
        let contact = player_contact(Vec3::new(0.0, 2.0, 0.0), 0.5, Vec3::ZERO, 0.5);
        assert_eq!(contact.normal, Vec3::Y);
    }

    #[test]
    fn test_closest_axis_points() {
        // a выше b: нижняя полусфера a против верхней b
        let (a, b) = closest_axis_points(Vec3::new(0.0, 3.0, 0.0), 0.5, Vec3::ZERO, 0.5);
        assert_eq!(a, Vec3::new(0.0, 3.5, 0.0));
        assert_eq!(b, Vec3::new(0.0, 1.5, 0.0));

        // a ниже b
        let (a, b) = closest_axis_points(Vec3::ZERO, 0.5, Vec3::new(0.0, 3.0, 0.0), 0.5);
        assert_eq!(a, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(b, Vec3::new(0.0, 3.5, 0.0));
    }

    #[test]
    fn test_apply_accumulates_until_physics_step() {
        let mut app = App::new();
        app.add_systems(Update, apply_displacement_rapier);

        let player = app
            .world_mut()
            .spawn((Locomotion::default(), KinematicCharacterController::default()))
            .id();

        // Два tick без physics step между ними
        for step in [Vec3::X, Vec3::new(0.5, -0.25, 0.0)] {
            app.world_mut().get_mut::<PendingDisplacement>(player).unwrap().0 = step;
            app.update();
        }

        let controller = app.world().get::<KinematicCharacterController>(player).unwrap();
        assert_eq!(controller.translation, Some(Vec3::new(1.5, -0.25, 0.0)));
        assert_eq!(app.world().get::<PendingDisplacement>(player).unwrap().0, Vec3::ZERO);
    }

    #[test]
    fn test_separate_pushes_upper_player_out() {
        let mut app = App::new();
        app.add_systems(Update, separate_overlapping_players);

        let lower = app
            .world_mut()
            .spawn((Locomotion::default(), KinematicCharacterController::default(), Transform::IDENTITY))
            .id();
        // Нижняя полусфера верхнего утоплена в голову нижнего
        let upper = app
            .world_mut()
            .spawn((
                Locomotion::default(),
                KinematicCharacterController::default(),
                Transform::from_xyz(-0.138, 1.475, -0.138),
            ))
            .id();

        app.update();

        let lower_position = app.world().get::<Transform>(lower).unwrap().translation;
        let upper_position = app.world().get::<Transform>(upper).unwrap().translation;
        assert_eq!(lower_position, Vec3::ZERO);

        let (a, b) = closest_axis_points(upper_position, 0.5, lower_position, 0.5);
        let gap = (a - b).length();
        assert!(gap >= 1.0 && gap < 1.0 + 2.0 * SEPARATION_SKIN, "gap = {}", gap);
        // Выталкивает вверх и в сторону смещения
        assert!(upper_position.y > 1.475);
        assert!(upper_position.x < -0.138);
        assert!(upper_position.z < -0.138);
    }

    #[test]
    fn test_separate_ignores_touching_players() {
        let mut app = App::new();
        app.add_systems(Update, separate_overlapping_players);

        let a = app
            .world_mut()
            .spawn((Locomotion::default(), KinematicCharacterController::default(), Transform::IDENTITY))
            .id();
        let b = app
            .world_mut()
            .spawn((
                Locomotion::default(),
                KinematicCharacterController::default(),
                Transform::from_xyz(1.05, 0.0, 0.0),
            ))
            .id();

        app.update();

        assert_eq!(app.world().get::<Transform>(a).unwrap().translation, Vec3::ZERO);
        assert_eq!(app.world().get::<Transform>(b).unwrap().translation, Vec3::new(1.05, 0.0, 0.0));
    }
}
