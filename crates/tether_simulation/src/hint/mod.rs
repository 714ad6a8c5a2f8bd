//! Interaction hints - текстовые подсказки над объектами

use bevy::prelude::*;

pub mod components;
pub mod systems;

pub use components::{HintAlignment, HintLabel, InteractionHint, HINT_LABEL_COLOR, HINT_LABEL_SIZE};
pub use systems::{attach_hint_labels, handle_hint_commands, HintAction, HintCommand};

/// Hint Plugin (Update: presentation, не simulation tick)
///
/// attach → handle_commands: chain вставляет sync point, поэтому
/// команда в кадре attach уже видит label.
pub struct HintPlugin;

impl Plugin for HintPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HintCommand>()
            .register_type::<InteractionHint>()
            .register_type::<HintLabel>()
            .add_systems(Update, (attach_hint_labels, handle_hint_commands).chain());
    }
}
