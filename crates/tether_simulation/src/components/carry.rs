//! Carry mechanic state
//!
//! Игрок может нести груз (кабель). Пока несёт - double jump не взводится.

use bevy::prelude::*;

use crate::locomotion::{CarryQuery, LiftPressed};
use crate::logger;

/// Состояние переноски груза
///
/// Опциональный компонент: entity без `CarryCable` считается "не несёт".
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CarryCable {
    pub carrying: bool,
}

impl CarryCable {
    pub fn toggle(&mut self) {
        self.carrying = !self.carrying;
    }
}

impl CarryQuery for CarryCable {
    fn is_carrying(&self) -> bool {
        self.carrying
    }
}

/// Lift → взять/бросить груз
pub fn toggle_carry_on_lift(mut lifts: EventReader<LiftPressed>, mut cables: Query<&mut CarryCable>) {
    for event in lifts.read() {
        if let Ok(mut cable) = cables.get_mut(event.entity) {
            cable.toggle();
            logger::log(&format!("Carry {:?}: carrying = {}", event.entity, cable.carrying));
        }
    }
}
