//! Коллабораторы locomotion controller
//!
//! Controller не ищет компоненты сам: всё что ему нужно от мира
//! (анимация, звук, carry mechanic, камера, ground probe) передаётся
//! явно в вызов через эти trait'ы.

use bevy::prelude::*;

use crate::components::{AnimationTrigger, SoundClip};

/// Приёмник fire-once анимационных триггеров
pub trait AnimationSink {
    fn set_trigger(&mut self, trigger: AnimationTrigger);
    fn reset_trigger(&mut self, trigger: AnimationTrigger);
}

/// Проигрыватель случайного звука из списка
pub trait SoundPlayer {
    /// Проиграть случайный клип с шансом `chance` (0-100)
    fn play(&mut self, clips: &[SoundClip], chance: f32);

    fn play_always(&mut self, clips: &[SoundClip]) {
        self.play(clips, 100.0);
    }
}

/// Несёт ли entity груз (блокирует взвод double jump)
pub trait CarryQuery {
    fn is_carrying(&self) -> bool;
}

/// Camera-relative basis для маппинга 2D input → world
pub trait CameraBasis {
    fn forward(&self) -> Vec3;
    fn right(&self) -> Vec3;
}

impl CameraBasis for Transform {
    fn forward(&self) -> Vec3 {
        Transform::forward(self).as_vec3()
    }

    fn right(&self) -> Vec3 {
        Transform::right(self).as_vec3()
    }
}

/// Результат ground probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Нормаль поверхности в точке попадания (world space)
    pub normal: Vec3,
    /// Дистанция от origin
    pub distance: f32,
}

/// Физический probe мира (sphere cast вниз)
///
/// Реализации обязаны исключать слой самого игрока.
pub trait GroundProbe {
    fn cast(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32) -> Option<ProbeHit>;
}

/// Probe, который никогда ничего не находит (воздух)
pub struct NoGround;

impl GroundProbe for NoGround {
    fn cast(&self, _origin: Vec3, _radius: f32, _direction: Vec3, _max_distance: f32) -> Option<ProbeHit> {
        None
    }
}

/// Probe с фиксированной нормалью поверхности (наклонная плоскость под ногами)
pub struct FixedSurface {
    pub normal: Vec3,
    pub distance: f32,
}

impl GroundProbe for FixedSurface {
    fn cast(&self, _origin: Vec3, _radius: f32, _direction: Vec3, max_distance: f32) -> Option<ProbeHit> {
        (self.distance <= max_distance).then_some(ProbeHit {
            normal: self.normal,
            distance: self.distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_camera_basis() {
        // Bevy: forward = -Z, right = +X
        let transform = Transform::IDENTITY;
        assert!((CameraBasis::forward(&transform) - Vec3::NEG_Z).length() < 1e-6);
        assert!((CameraBasis::right(&transform) - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_fixed_surface_respects_max_distance() {
        let probe = FixedSurface { normal: Vec3::Y, distance: 0.5 };
        assert!(probe.cast(Vec3::ZERO, 0.5, Vec3::NEG_Y, 10.0).is_some());
        assert!(probe.cast(Vec3::ZERO, 0.5, Vec3::NEG_Y, 0.1).is_none());
        assert!(NoGround.cast(Vec3::ZERO, 0.5, Vec3::NEG_Y, 10.0).is_none());
    }
}
