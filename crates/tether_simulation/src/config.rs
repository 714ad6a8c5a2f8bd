//! Конфигурация симуляции
//!
//! Все параметры имеют defaults (как в inspector'е), JSON может
//! переопределить любую часть. Валидация - при загрузке, не per-tick.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::JumpSounds;
use crate::error::ConfigError;
use crate::locomotion::slope::SLIDE_CURVE_ZERO_DEG;

/// Параметры локомоции игрока
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Скорость ходьбы (m/s)
    pub speed: f32,
    /// Высота прыжка (m)
    pub jump_height: f32,
    /// Высота double jump относительно обычного
    pub double_jump_ratio: f32,
    /// Гравитация (m/s², отрицательная = вниз)
    pub gravity: f32,
    /// Максимальный угол склона от вертикали (градусы), круче - скольжение
    pub slope_limit: f32,
    /// Coyote time (секунды)
    pub coyote_time: f32,
    /// Постоянная velocity.y на земле (держит контакт с поверхностью)
    pub grounded_bias: f32,
    /// Ниже этой velocity.y double jump сначала гасит падение
    pub descending_threshold: f32,
    /// Радиус capsule контроллера (m)
    pub radius: f32,
    /// Дальность slope probe (m)
    pub probe_distance: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            jump_height: 1.0,
            double_jump_ratio: 1.0,
            gravity: -9.81, // Earth gravity
            slope_limit: 45.0,
            coyote_time: 0.1,
            grounded_bias: -2.0,
            descending_threshold: -1.0,
            radius: 0.5,
            probe_distance: 10.0,
        }
    }
}

impl LocomotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("speed", self.speed),
            ("jump_height", self.jump_height),
            ("double_jump_ratio", self.double_jump_ratio),
            ("gravity", self.gravity),
            ("slope_limit", self.slope_limit),
            ("coyote_time", self.coyote_time),
            ("grounded_bias", self.grounded_bias),
            ("descending_threshold", self.descending_threshold),
            ("radius", self.radius),
            ("probe_distance", self.probe_distance),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }

        // sqrt(jump_height * -2 * gravity) должен быть вещественным
        if self.gravity >= 0.0 {
            return Err(ConfigError::InvalidParameter { name: "gravity", value: self.gravity });
        }
        if self.jump_height < 0.0 {
            return Err(ConfigError::InvalidParameter { name: "jump_height", value: self.jump_height });
        }
        if self.double_jump_ratio < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "double_jump_ratio",
                value: self.double_jump_ratio,
            });
        }
        // Sphere probe радиусом radius - 0.01
        if self.radius <= 0.01 {
            return Err(ConfigError::InvalidParameter { name: "radius", value: self.radius });
        }
        if self.slope_limit < SLIDE_CURVE_ZERO_DEG {
            return Err(ConfigError::SlopeLimitTooLow(self.slope_limit));
        }
        Ok(())
    }
}

/// Параметры interaction hint по умолчанию
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct HintConfig {
    pub message: String,
    pub font_size: f32,
    /// Высота над хостом (m)
    pub offset_y: f32,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            message: String::new(),
            font_size: 5.0,
            offset_y: 1.0,
        }
    }
}

/// Корневой конфиг (locomotion + sounds + hints)
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub locomotion: LocomotionConfig,
    pub jump_sounds: JumpSounds,
    pub hint: HintConfig,
    /// Seed для DeterministicRng
    pub seed: u64,
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.locomotion.validate()?;
        let chance = self.jump_sounds.chance_to_play;
        if !(0.0..=100.0).contains(&chance) {
            return Err(ConfigError::InvalidParameter { name: "chance_to_play", value: chance });
        }
        Ok(())
    }
}
