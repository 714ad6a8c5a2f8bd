//! Animation триггеры и state machine
//!
//! Семантика fire-once trigger:
//! - `set_trigger` взводит сигнал
//! - `reset_trigger` снимает его без срабатывания
//! - Animator потребляет взведённый сигнал на следующей проверке
//!   и не видит его снова пока кто-то не взведёт заново
//!
//! Locomotion controller только взводит/сбрасывает, тайминг переходов - у Animator.

use bevy::prelude::*;

use crate::locomotion::AnimationSink;
use crate::logger;

/// Именованные триггеры анимации персонажа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimationTrigger {
    Idle,
    Walk,
    Jump,
}

impl AnimationTrigger {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationTrigger::Idle => "Idle",
            AnimationTrigger::Walk => "Walk",
            AnimationTrigger::Jump => "Jump",
        }
    }

    fn bit(self) -> u8 {
        match self {
            AnimationTrigger::Idle => 0b001,
            AnimationTrigger::Walk => 0b010,
            AnimationTrigger::Jump => 0b100,
        }
    }
}

/// Взведённые (ещё не потреблённые) триггеры
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AnimationTriggers {
    armed: u8,
}

impl AnimationTriggers {
    pub fn is_set(&self, trigger: AnimationTrigger) -> bool {
        self.armed & trigger.bit() != 0
    }

    /// Потребить триггер: true если был взведён (и теперь снят)
    pub fn consume(&mut self, trigger: AnimationTrigger) -> bool {
        let was_set = self.is_set(trigger);
        self.armed &= !trigger.bit();
        was_set
    }

    pub fn is_empty(&self) -> bool {
        self.armed == 0
    }
}

impl AnimationSink for AnimationTriggers {
    fn set_trigger(&mut self, trigger: AnimationTrigger) {
        self.armed |= trigger.bit();
    }

    fn reset_trigger(&mut self, trigger: AnimationTrigger) {
        self.armed &= !trigger.bit();
    }
}

/// Состояния анимации персонажа
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum AnimatorState {
    #[default]
    Idle,
    Walking,
    Jumping,
}

/// Простая state machine, потребляющая триггеры
///
/// Приоритет: Jump > Walk > Idle. За одну проверку потребляется
/// один триггер, остальные ждут следующего тика.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Animator {
    pub state: AnimatorState,
}

impl Animator {
    /// Один шаг state machine. Возвращает новое состояние если был переход.
    pub fn advance(&mut self, triggers: &mut AnimationTriggers) -> Option<AnimatorState> {
        let next = if triggers.consume(AnimationTrigger::Jump) {
            AnimatorState::Jumping
        } else if triggers.consume(AnimationTrigger::Walk) {
            AnimatorState::Walking
        } else if triggers.consume(AnimationTrigger::Idle) {
            AnimatorState::Idle
        } else {
            return None;
        };

        if next == self.state {
            return None;
        }
        self.state = next;
        Some(next)
    }
}

/// Система: Animator потребляет взведённые триггеры
///
/// Запускается после tick локомоции (триггеры этого тика уже взведены).
pub fn advance_animators(mut query: Query<(Entity, &mut Animator, &mut AnimationTriggers)>) {
    for (entity, mut animator, mut triggers) in query.iter_mut() {
        if triggers.is_empty() {
            continue;
        }
        if let Some(state) = animator.advance(&mut triggers) {
            logger::log(&format!("Animator {:?} → {:?}", entity, state));
        }
    }
}
