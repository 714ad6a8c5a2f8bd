//! Interaction hint компоненты
//!
//! Подсказка над объектом ("Press E to lift"): хост несёт InteractionHint,
//! текстовый label - отдельная child entity.

use bevy::prelude::*;

use crate::config::HintConfig;

/// Размер label (world units)
pub const HINT_LABEL_SIZE: Vec2 = Vec2::new(3.0, 3.0);

/// Чёрный, непрозрачный (linear RGBA)
pub const HINT_LABEL_COLOR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// Параметры подсказки на хосте
///
/// Изменения (configure) не трогают уже построенный label -
/// только следующий Refresh или attach.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct InteractionHint {
    pub message: String,
    pub font_size: f32,
    /// Высота над верхом хоста (m)
    pub offset_y: f32,
    label: Option<Entity>,
}

impl Default for InteractionHint {
    fn default() -> Self {
        Self::from_config(&HintConfig::default())
    }
}

impl InteractionHint {
    pub fn new(message: impl Into<String>, font_size: f32, offset_y: f32) -> Self {
        Self {
            message: message.into(),
            font_size,
            offset_y,
            label: None,
        }
    }

    pub fn from_config(config: &HintConfig) -> Self {
        Self::new(config.message.clone(), config.font_size, config.offset_y)
    }

    /// Обновляет параметры (применятся при следующем построении label)
    pub fn configure(&mut self, message: impl Into<String>, font_size: f32, offset_y: f32) {
        self.message = message.into();
        self.font_size = font_size;
        self.offset_y = offset_y;
    }

    /// Child entity label (после attach)
    pub fn label(&self) -> Option<Entity> {
        self.label
    }

    pub(crate) fn set_label(&mut self, label: Entity) {
        self.label = Some(label);
    }

    /// Локальная позиция label: половина высоты хоста + offset
    pub fn label_translation(&self, host_scale: Vec3) -> Vec3 {
        Vec3::new(0.0, host_scale.y / 2.0 + self.offset_y, 0.0)
    }

    /// Новый label по текущим параметрам (скрытый)
    pub fn build_label(&self) -> HintLabel {
        HintLabel {
            text: self.message.clone(),
            font_size: self.font_size,
            color: HINT_LABEL_COLOR,
            alignment: HintAlignment::Center,
            size: HINT_LABEL_SIZE,
            visible: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum HintAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Текстовый label подсказки (world-space)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HintLabel {
    pub text: String,
    pub font_size: f32,
    pub color: Vec4,
    pub alignment: HintAlignment,
    pub size: Vec2,
    pub visible: bool,
}
