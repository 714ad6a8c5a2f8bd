//! Locomotion events

use bevy::prelude::*;

use super::controller::{GroundContact, JumpOutcome};

/// Событие: новое значение movement input (любая фаза: started/performed/canceled)
///
/// Генерируется:
/// - input dispatch (action `Movement`)
#[derive(Event, Debug, Clone, Copy)]
pub struct MovementInputEvent {
    pub entity: Entity,
    pub value: Vec2,
}

/// Событие: прыжок нажат (только rising edge "performed")
#[derive(Event, Debug, Clone, Copy)]
pub struct JumpPressed {
    pub entity: Entity,
}

/// Событие: нажата кнопка Lift (performed) - переключает carry
#[derive(Event, Debug, Clone, Copy)]
pub struct LiftPressed {
    pub entity: Entity,
}

/// Событие: контакт персонажа с поверхностью при последнем перемещении
///
/// Генерируется physics backend'ом (rapier или ground plane),
/// обрабатывается до tick локомоции.
#[derive(Event, Debug, Clone, Copy)]
pub struct GroundContactEvent {
    pub entity: Entity,
    pub contact: GroundContact,
}

/// Событие: прыжок выполнен (для UI, VFX, статистики)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jumped {
    pub entity: Entity,
    pub outcome: JumpOutcome,
}
