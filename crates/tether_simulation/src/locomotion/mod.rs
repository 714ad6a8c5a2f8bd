//! Locomotion domain - third-person контроллер игрока
//!
//! Содержит:
//! - Locomotion (coyote time, jump/double jump, slope slide, стакинг)
//! - Collaborator traits (анимация, звук, carry, камера, ground probe)
//! - Staging компоненты между physics backend и tick
//! - LocomotionPlugin (порядок систем в FixedUpdate)

use bevy::prelude::*;

pub mod collaborators;
pub mod controller;
pub mod events;
pub mod sensors;
pub mod slope;
pub mod systems;


pub use collaborators::{AnimationSink, CameraBasis, CarryQuery, FixedSurface, GroundProbe, NoGround, ProbeHit, SoundPlayer};
pub use controller::{
    GroundContact, JumpContext, JumpOutcome, Locomotion, LocomotionState, TickInput, TickOutput,
    STACK_HEIGHT_THRESHOLD,
};
pub use events::{GroundContactEvent, JumpPressed, Jumped, LiftPressed, MovementInputEvent};
pub use sensors::{GroundProbeSample, GroundSensor, PendingDisplacement};
pub use slope::{evaluate_slope, slope_angle_degrees, steep_slide_direction, ProbeRay};

use crate::components::{advance_animators, toggle_carry_on_lift, AnimationTriggers, Animator, CarryCable, SoundPlayed};

/// Фазы locomotion frame (FixedUpdate)
///
/// Physics backend встраивается в `Sense` (grounded, probe, контакты
/// прошлого перемещения) и `Apply` (применение displacement).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Attach-time валидация + снятые коллабораторы
    Validate,
    /// Backend: grounded + slope probe + GroundContactEvent
    Sense,
    /// Контакты → debounce стакинга
    Contacts,
    /// Device state → action события
    Dispatch,
    /// Input dispatch + movement/jump обработка
    Input,
    Tick,
    /// Backend: PendingDisplacement → позиция
    Apply,
    Animate,
}

/// Locomotion Plugin
///
/// Порядок выполнения (каждый FixedUpdate):
/// 1. validate_locomotion_setup / validate_collaborators_retained - новые и изменённые контроллеры
/// 2. Sense - backend снимает grounded/probe/контакты
/// 3. apply_ground_contacts
/// 4. Dispatch - input plugin превращает device state в события
/// 5. apply_movement_input, toggle_carry_on_lift → handle_jump_pressed
/// 6. tick_locomotion
/// 7. Apply - backend двигает персонажа
/// 8. advance_animators
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MovementInputEvent>()
            .add_event::<JumpPressed>()
            .add_event::<LiftPressed>()
            .add_event::<GroundContactEvent>()
            .add_event::<Jumped>()
            .add_event::<SoundPlayed>()
            .register_type::<Locomotion>()
            .register_type::<GroundSensor>()
            .register_type::<CarryCable>()
            .register_type::<AnimationTriggers>()
            .register_type::<Animator>();

        app.configure_sets(
            FixedUpdate,
            (
                LocomotionSet::Validate,
                LocomotionSet::Sense,
                LocomotionSet::Contacts,
                LocomotionSet::Dispatch,
                LocomotionSet::Input,
                LocomotionSet::Tick,
                LocomotionSet::Apply,
                LocomotionSet::Animate,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                (systems::validate_locomotion_setup, systems::validate_collaborators_retained)
                    .in_set(LocomotionSet::Validate),
                systems::apply_ground_contacts.in_set(LocomotionSet::Contacts),
                (
                    (systems::apply_movement_input, toggle_carry_on_lift),
                    systems::handle_jump_pressed,
                )
                    .chain()
                    .in_set(LocomotionSet::Input),
                systems::tick_locomotion.in_set(LocomotionSet::Tick),
                advance_animators.in_set(LocomotionSet::Animate),
            ),
        );
    }
}
