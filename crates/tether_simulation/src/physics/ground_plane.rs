//! Headless physics backend: аналитическая плоскость
//!
//! Без Rapier: одна бесконечная плоскость, grounded если основание
//! персонажа в пределах skin от неё. Для тестов и headless симуляции.

use bevy::prelude::*;

use crate::locomotion::{
    GroundContact, GroundContactEvent, GroundProbe, GroundProbeSample, GroundSensor, Locomotion, LocomotionSet,
    PendingDisplacement, ProbeHit, ProbeRay,
};

/// Зазор, в пределах которого основание считается стоящим на плоскости (m)
pub const GROUND_SKIN: f32 = 0.02;

/// Бесконечная плоскость (точка + нормаль)
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self::flat(0.0)
    }
}

impl GroundPlane {
    /// Горизонтальный пол на высоте `height`
    pub fn flat(height: f32) -> Self {
        Self {
            point: Vec3::new(0.0, height, 0.0),
            normal: Vec3::Y,
        }
    }

    /// Плоскость через начало координат с заданной нормалью
    pub fn tilted(normal: Vec3) -> Self {
        Self {
            point: Vec3::ZERO,
            normal: normal.normalize_or(Vec3::Y),
        }
    }

    pub fn signed_distance(&self, position: Vec3) -> f32 {
        self.normal.dot(position - self.point)
    }

    /// Выталкивает точку на поверхность если она под плоскостью
    pub fn resolve(&self, position: Vec3) -> Vec3 {
        let distance = self.signed_distance(position);
        if distance < 0.0 {
            position - self.normal * distance
        } else {
            position
        }
    }
}

impl GroundProbe for GroundPlane {
    /// Sphere sweep против плоскости
    fn cast(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32) -> Option<ProbeHit> {
        let approach = self.normal.dot(direction);
        if approach >= 0.0 {
            return None;
        }

        // Уже пересекаемся - попадание в origin
        let distance = ((self.signed_distance(origin) - radius) / -approach).max(0.0);
        (distance <= max_distance).then_some(ProbeHit {
            normal: self.normal,
            distance,
        })
    }
}

/// Per-entity нормаль под ногами (склон без наклона самой плоскости)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SlopeOverride {
    pub normal: Vec3,
}

/// Плоскость с подменённой нормалью попадания
struct OverriddenSurface<'a> {
    plane: &'a GroundPlane,
    normal: Vec3,
}

impl GroundProbe for OverriddenSurface<'_> {
    fn cast(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32) -> Option<ProbeHit> {
        self.plane
            .cast(origin, radius, direction, max_distance)
            .map(|hit| ProbeHit { normal: self.normal, ..hit })
    }
}

/// Sense: grounded, slope probe и контакт с плоскостью
pub fn sense_ground_plane(
    plane: Res<GroundPlane>,
    mut players: Query<(
        Entity,
        &Locomotion,
        &Transform,
        &mut GroundSensor,
        &mut GroundProbeSample,
        Option<&SlopeOverride>,
    )>,
    mut contacts: EventWriter<GroundContactEvent>,
) {
    for (entity, locomotion, transform, mut sensor, mut sample, slope) in players.iter_mut() {
        let position = transform.translation;
        sensor.grounded = plane.signed_distance(position) <= GROUND_SKIN;

        let ray = ProbeRay::below(position, &locomotion.config);
        *sample = match slope {
            Some(slope) => GroundProbeSample::record(
                ray,
                &OverriddenSurface {
                    plane: &*plane,
                    normal: slope.normal,
                },
            ),
            None => GroundProbeSample::record(ray, &*plane),
        };

        if sensor.grounded {
            contacts.write(GroundContactEvent {
                entity,
                contact: GroundContact {
                    normal: slope.map_or(plane.normal, |slope| slope.normal),
                    other_is_player: false,
                    other_vertical_offset: 0.0,
                },
            });
        }
    }
}

/// Apply: displacement → translation, не проваливаемся под плоскость
pub fn apply_displacement_on_plane(
    plane: Res<GroundPlane>,
    mut players: Query<(&mut Transform, &mut PendingDisplacement), With<Locomotion>>,
) {
    for (mut transform, mut pending) in players.iter_mut() {
        transform.translation = plane.resolve(transform.translation + pending.0);
        pending.0 = Vec3::ZERO;
    }
}

/// Headless backend plugin (вместо Rapier)
pub struct GroundPlanePlugin;

impl Plugin for GroundPlanePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GroundPlane>().add_systems(
            FixedUpdate,
            (
                sense_ground_plane.in_set(LocomotionSet::Sense),
                apply_displacement_on_plane.in_set(LocomotionSet::Apply),
            ),
        );
    }
}
