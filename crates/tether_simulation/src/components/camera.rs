//! Camera rig marker
//!
//! Активная камера, относительно которой считается WASD направление.

use bevy::prelude::Component;

/// Маркер активного camera rig
///
/// Вместо глобального "main camera" lookup: tick система явно находит
/// единственную entity с `CameraRig` и передаёт её `Transform` в controller.
/// Больше одной (или ноль) - конфигурационная ошибка.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct CameraRig;
