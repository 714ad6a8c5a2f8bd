//! Input domain - action asset, device state, подписки и dispatch
//!
//! Содержит:
//! - InputActionAsset (JSON: action maps, bindings, control schemes)
//! - DeviceState (что нажато сейчас, пишет хост)
//! - ActionSubscriptions + InputScheme (кто какой схемой управляет)
//! - dispatch → MovementInputEvent / JumpPressed / LiftPressed

use bevy::prelude::*;

pub mod actions;
pub mod bindings;
pub mod dispatch;
pub mod events;

pub use actions::{
    ActionKind, Binding, CompositeParts, InputActionAsset, PlayerAction, ResolvedAction, ResolvedScheme,
    PLAYER_CONTROLS_JSON, PLAYER_MAP,
};
pub use bindings::DeviceState;
pub use dispatch::{
    bind_input_schemes, dispatch_player_input, phase_transitions, unbind_removed_schemes, ActionSubscriptions,
    InputScheme, PlayerControls,
};
pub use events::{ActionPhase, InputActionEvent};

use crate::locomotion::LocomotionSet;
use crate::logger;

/// Player Input Plugin
///
/// Встроенный asset грузится при сборке app. Битый asset логируется,
/// а первая же подписка падает с MissingInputAsset.
pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        match InputActionAsset::player_controls() {
            Ok(asset) => {
                app.insert_resource(PlayerControls(asset));
            }
            Err(err) => logger::log_error(&format!("Input: failed to load player controls: {}", err)),
        }

        app.init_resource::<DeviceState>()
            .init_resource::<ActionSubscriptions>()
            .add_event::<InputActionEvent>()
            .register_type::<InputScheme>();

        app.add_systems(
            FixedUpdate,
            (bind_input_schemes, unbind_removed_schemes, dispatch_player_input)
                .chain()
                .in_set(LocomotionSet::Dispatch),
        );
    }
}
