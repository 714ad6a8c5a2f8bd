//! Audio компоненты: звуковые банки прыжков, SoundPlayed событие
//!
//! Симуляция не проигрывает звук сама - она решает ЧТО проиграть
//! и отправляет `SoundPlayed`, хост (аудио слой) уже воспроизводит.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Идентификатор звукового клипа (asset path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
#[serde(transparent)]
pub struct SoundClip(pub String);

impl SoundClip {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

impl From<&str> for SoundClip {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Звуки прыжков игрока
///
/// - `jump` / `double_jump`: проигрываются с шансом `chance_to_play` (%)
/// - `always_jump` / `always_double_jump`: проигрываются всегда
#[derive(Component, Debug, Clone, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct JumpSounds {
    /// Шанс проиграть звук (0-100, 100 = всегда)
    pub chance_to_play: f32,
    pub jump: Vec<SoundClip>,
    pub double_jump: Vec<SoundClip>,
    pub always_jump: Vec<SoundClip>,
    pub always_double_jump: Vec<SoundClip>,
}

impl Default for JumpSounds {
    fn default() -> Self {
        Self {
            chance_to_play: 80.0,
            jump: Vec::new(),
            double_jump: Vec::new(),
            always_jump: Vec::new(),
            always_double_jump: Vec::new(),
        }
    }
}

/// Событие: звук выбран для проигрывания
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SoundPlayed {
    /// Кто издал звук
    pub source: Entity,
    pub clip: SoundClip,
}
