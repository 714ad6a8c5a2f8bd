//! Interaction hint системы

use bevy::prelude::*;

use super::components::{HintLabel, InteractionHint};
use crate::logger;

/// Что сделать с подсказкой хоста
#[derive(Debug, Clone, PartialEq)]
pub enum HintAction {
    /// Показать (идемпотентно)
    Activate,
    /// Скрыть (идемпотентно)
    Deactivate,
    /// Новые параметры, без перестройки label
    Configure {
        message: String,
        font_size: f32,
        offset_y: f32,
    },
    /// Перестроить label из текущих параметров (видимость сохраняется)
    Refresh,
}

/// Команда подсказке
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HintCommand {
    pub host: Entity,
    pub action: HintAction,
}

impl HintCommand {
    pub fn activate(host: Entity) -> Self {
        Self { host, action: HintAction::Activate }
    }

    pub fn deactivate(host: Entity) -> Self {
        Self { host, action: HintAction::Deactivate }
    }
}

/// Attach: новый InteractionHint → скрытый child label над хостом
pub fn attach_hint_labels(
    mut commands: Commands,
    mut hosts: Query<(Entity, &mut InteractionHint, &Transform), Added<InteractionHint>>,
) {
    for (host, mut hint, transform) in hosts.iter_mut() {
        let label = commands
            .spawn((
                Name::new("HintLabel"),
                hint.build_label(),
                Transform::from_translation(hint.label_translation(transform.scale)),
                ChildOf(host),
            ))
            .id();
        hint.set_label(label);

        logger::log(&format!("Hint attached to {:?} (label {:?})", host, label));
    }
}

/// HintCommand → label / параметры хоста
pub fn handle_hint_commands(
    mut commands_in: EventReader<HintCommand>,
    mut hosts: Query<(&mut InteractionHint, &Transform)>,
    mut labels: Query<(&mut HintLabel, &mut Transform), Without<InteractionHint>>,
) {
    for command in commands_in.read() {
        let Ok((mut hint, host_transform)) = hosts.get_mut(command.host) else {
            continue;
        };

        match &command.action {
            HintAction::Configure { message, font_size, offset_y } => {
                hint.configure(message.clone(), *font_size, *offset_y);
            }
            action => {
                let Some((mut label, mut label_transform)) =
                    hint.label().and_then(|entity| labels.get_mut(entity).ok())
                else {
                    logger::log_warning(&format!("Hint {:?}: label not attached yet", command.host));
                    continue;
                };

                match action {
                    HintAction::Activate => label.visible = true,
                    HintAction::Deactivate => label.visible = false,
                    HintAction::Refresh => {
                        let visible = label.visible;
                        *label = HintLabel { visible, ..hint.build_label() };
                        label_transform.translation = hint.label_translation(host_transform.scale);
                    }
                    HintAction::Configure { .. } => {}
                }
            }
        }
    }
}
