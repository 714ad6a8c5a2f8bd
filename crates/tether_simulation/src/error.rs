//! Ошибки конфигурации
//!
//! Все ошибки - attach-time/startup. Per-tick логика локомоции тотальна
//! и ошибок не производит (кроме отсутствующей камеры - та же конфигурационная ошибка).

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// У entity нет обязательного коллаборатора (AnimationTriggers, JumpSounds, ...)
    #[error("entity {entity:?} is missing required collaborator `{component}`")]
    MissingCollaborator {
        entity: Entity,
        component: &'static str,
    },

    /// Ни одной (или больше одной) entity с CameraRig
    #[error("no single active camera rig in the world")]
    MissingCameraRig,

    /// slope_limit <= 35° даёт деление на ноль в slide curve (angle - 35) / 20
    #[error("slope limit {0}° must be at least 35° (slide curve zero crossing)")]
    SlopeLimitTooLow(f32),

    #[error("parameter `{name}` has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("unknown input action `{0}`")]
    UnknownAction(String),

    #[error("unknown control scheme `{0}`")]
    UnknownControlScheme(String),

    #[error("input action asset is not loaded")]
    MissingInputAsset,

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
