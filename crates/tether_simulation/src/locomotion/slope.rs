//! Steep slope detection + slide direction
//!
//! Slide curve: divisor = (angle - 35) / 20
//! - подобранная вручную кривая (не физика): чем круче склон, тем сильнее толчок
//! - zero crossing около slope limit, поэтому slope_limit < 35° запрещён конфигом

use bevy::prelude::*;

use super::collaborators::{GroundProbe, ProbeHit};
use crate::config::LocomotionConfig;

/// Угол, на котором divisor slide curve обращается в ноль
pub const SLIDE_CURVE_ZERO_DEG: f32 = 35.0;

/// Ширина slide curve (градусы)
pub const SLIDE_CURVE_SPAN_DEG: f32 = 20.0;

/// Зазор между радиусом capsule и радиусом probe сферы
pub const PROBE_RADIUS_SKIN: f32 = 0.01;

/// Параметры slope probe (sphere cast)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRay {
    pub origin: Vec3,
    pub radius: f32,
    pub direction: Vec3,
    pub max_distance: f32,
}

impl ProbeRay {
    /// Sphere cast вниз из точки на `radius` выше основания
    pub fn below(position: Vec3, config: &LocomotionConfig) -> Self {
        Self {
            origin: position + Vec3::new(0.0, config.radius, 0.0),
            radius: config.radius - PROBE_RADIUS_SKIN,
            direction: Vec3::NEG_Y,
            max_distance: config.probe_distance,
        }
    }

    pub fn cast(&self, probe: &dyn GroundProbe) -> Option<ProbeHit> {
        probe.cast(self.origin, self.radius, self.direction, self.max_distance)
    }
}

/// Угол нормали поверхности от вертикали (градусы)
pub fn slope_angle_degrees(normal: Vec3) -> f32 {
    Vec3::Y.angle_between(normal).to_degrees()
}

/// Slide direction для поверхности с нормалью `normal`
///
/// None если склон не круче `slope_limit` (ровно на лимите - ещё не скользим).
/// Горизонтальные компоненты нормали масштабируются на (1 - normal.y) / divisor
/// и инвертируются; controller потом двигает на `-speed * slide_direction`.
pub fn steep_slide_direction(normal: Vec3, slope_limit: f32) -> Option<Vec3> {
    let angle = slope_angle_degrees(normal);
    if angle <= slope_limit {
        return None;
    }

    let speed_divisor = (angle - SLIDE_CURVE_ZERO_DEG) / SLIDE_CURVE_SPAN_DEG;
    let y_inverse = 1.0 - normal.y;
    Some(Vec3::new(
        -y_inverse * normal.x / speed_divisor,
        0.0,
        -y_inverse * normal.z / speed_divisor,
    ))
}

/// Sphere cast вниз из точки чуть выше основания персонажа
///
/// Возвращает slide direction если персонаж на земле и под ним крутой склон.
/// Probe реализация сама исключает слой игроков.
pub fn evaluate_slope(
    grounded: bool,
    position: Vec3,
    probe: &dyn GroundProbe,
    config: &LocomotionConfig,
) -> Option<Vec3> {
    if !grounded {
        return None;
    }

    let hit = ProbeRay::below(position, config).cast(probe)?;
    steep_slide_direction(hit.normal, config.slope_limit)
}
