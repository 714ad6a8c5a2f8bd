//! Input events

use bevy::prelude::*;

use super::actions::PlayerAction;

/// Фаза action (как callback context: started/performed/canceled)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ActionPhase {
    Started,
    Performed,
    Canceled,
}

/// Событие: action подписчика сменил фазу
///
/// Общий поток для всех действий; locomotion слушает специализированные
/// события (MovementInputEvent, JumpPressed, LiftPressed).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InputActionEvent {
    pub entity: Entity,
    pub action: PlayerAction,
    pub phase: ActionPhase,
    pub value: Vec2,
}
