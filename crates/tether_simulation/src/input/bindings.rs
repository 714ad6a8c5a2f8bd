//! Device state + вычисление значения action по биндингам
//!
//! Хост каждый кадр пишет в `DeviceState` что нажато и где стики;
//! dispatch читает его через резолвнутые биндинги схемы.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use super::actions::{Binding, CompositeParts, ResolvedAction};

/// Текущее состояние устройств (пути контролов как в asset)
#[derive(Resource, Debug, Clone, Default)]
pub struct DeviceState {
    pressed: HashSet<String>,
    sticks: HashMap<String, Vec2>,
}

impl DeviceState {
    pub fn press(&mut self, path: &str) {
        self.pressed.insert(path.to_string());
    }

    pub fn release(&mut self, path: &str) {
        self.pressed.remove(path);
    }

    pub fn set_stick(&mut self, path: &str, value: Vec2) {
        self.sticks.insert(path.to_string(), value.clamp_length_max(1.0));
    }

    pub fn is_pressed(&self, path: &str) -> bool {
        self.pressed.contains(path)
    }

    pub fn stick(&self, path: &str) -> Vec2 {
        self.sticks.get(path).copied().unwrap_or(Vec2::ZERO)
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
        self.sticks.clear();
    }

    fn any_pressed(&self, paths: &[String]) -> bool {
        paths.iter().any(|path| self.is_pressed(path))
    }

    fn axis(&self, negative: &[String], positive: &[String]) -> f32 {
        let mut value = 0.0;
        if self.any_pressed(positive) {
            value += 1.0;
        }
        if self.any_pressed(negative) {
            value -= 1.0;
        }
        value
    }

    /// 2D composite: диагональ нормализуется (digital normalized)
    pub fn composite(&self, parts: &CompositeParts) -> Vec2 {
        Vec2::new(
            self.axis(&parts.left, &parts.right),
            self.axis(&parts.down, &parts.up),
        )
        .normalize_or_zero()
    }

    /// Значение одного биндинга (кнопка = 1 по X)
    pub fn read(&self, binding: &Binding) -> Vec2 {
        match binding {
            Binding::Button(path) => {
                if self.is_pressed(path) {
                    Vec2::X
                } else {
                    Vec2::ZERO
                }
            }
            Binding::Stick(path) => self.stick(path),
            Binding::Composite(parts) => self.composite(parts),
        }
    }

    /// Значение action = самый сильный из его биндингов
    pub fn evaluate(&self, action: &ResolvedAction) -> Vec2 {
        action
            .bindings
            .iter()
            .map(|binding| self.read(binding))
            .fold(Vec2::ZERO, |strongest, value| {
                if value.length_squared() > strongest.length_squared() {
                    value
                } else {
                    strongest
                }
            })
    }
}
