//! Подписки на control schemes + dispatch action событий
//!
//! Подписка явная: entity ↔ резолвнутая схема. Dispatch раз в tick
//! вычисляет значения действий, сравнивает с прошлыми и пишет события
//! по фазам. Порядок подписчиков - по Entity (детерминизм).

use bevy::prelude::*;
use std::collections::BTreeMap;

use super::actions::{ActionKind, InputActionAsset, PlayerAction, ResolvedScheme, PLAYER_MAP};
use super::bindings::DeviceState;
use super::events::{ActionPhase, InputActionEvent};
use crate::error::ConfigError;
use crate::locomotion::{JumpPressed, LiftPressed, MovementInputEvent};
use crate::logger;

/// Фазы перехода значения action `previous` → `current`
///
/// - PassThrough: Performed на каждое изменение, Canceled при возврате в ноль
/// - Button: Started + Performed на нажатие, Canceled на отпускание
pub fn phase_transitions(kind: ActionKind, previous: Vec2, current: Vec2) -> &'static [ActionPhase] {
    let was_active = previous != Vec2::ZERO;
    let is_active = current != Vec2::ZERO;

    match kind {
        ActionKind::PassThrough => {
            if previous == current {
                &[]
            } else if is_active {
                &[ActionPhase::Performed]
            } else {
                &[ActionPhase::Canceled]
            }
        }
        ActionKind::Button => match (was_active, is_active) {
            (false, true) => &[ActionPhase::Started, ActionPhase::Performed],
            (true, false) => &[ActionPhase::Canceled],
            _ => &[],
        },
    }
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub scheme: ResolvedScheme,
    /// Последние значения, параллельно scheme.actions
    values: Vec<Vec2>,
}

impl Subscription {
    fn new(scheme: ResolvedScheme) -> Self {
        let values = vec![Vec2::ZERO; scheme.actions.len()];
        Self { scheme, values }
    }
}

/// Активные подписки (entity → схема)
#[derive(Resource, Debug, Default)]
pub struct ActionSubscriptions {
    by_entity: BTreeMap<Entity, Subscription>,
}

impl ActionSubscriptions {
    /// Подписать entity на схему. Повторная подписка на ту же схему - no-op,
    /// на другую - заменяет (значения сбрасываются).
    ///
    /// Возвращает true если подписка создана или изменена.
    pub fn subscribe(
        &mut self,
        entity: Entity,
        asset: &InputActionAsset,
        scheme: &str,
    ) -> Result<bool, ConfigError> {
        if self.scheme_of(entity) == Some(scheme) {
            return Ok(false);
        }

        let resolved = asset.resolve(PLAYER_MAP, scheme)?;
        self.by_entity.insert(entity, Subscription::new(resolved));
        Ok(true)
    }

    /// Отписать (true если подписка была)
    pub fn unsubscribe(&mut self, entity: Entity) -> bool {
        self.by_entity.remove(&entity).is_some()
    }

    pub fn scheme_of(&self, entity: Entity) -> Option<&str> {
        self.by_entity
            .get(&entity)
            .map(|subscription| subscription.scheme.scheme.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }
}

/// Загруженный asset управления
#[derive(Resource, Debug, Clone)]
pub struct PlayerControls(pub InputActionAsset);

/// Желаемая control scheme entity (подписка выполняется системой)
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct InputScheme(pub String);

impl InputScheme {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self(scheme.into())
    }
}

/// Новые/изменённые InputScheme → подписки
///
/// Неизвестная схема - конфигурационная ошибка (фатальна).
pub fn bind_input_schemes(
    changed: Query<(Entity, &InputScheme), Changed<InputScheme>>,
    controls: Option<Res<PlayerControls>>,
    mut subscriptions: ResMut<ActionSubscriptions>,
) -> Result {
    if changed.is_empty() {
        return Ok(());
    }
    let Some(controls) = controls else {
        return Err(ConfigError::MissingInputAsset.into());
    };

    for (entity, scheme) in changed.iter() {
        match subscriptions.subscribe(entity, &controls.0, &scheme.0) {
            Ok(true) => logger::log_info(&format!("Input: {:?} subscribed to {}", entity, scheme.0)),
            Ok(false) => {}
            Err(err) => {
                logger::log_error(&format!("Input: {:?} failed to subscribe: {}", entity, err));
                return Err(err.into());
            }
        }
    }

    Ok(())
}

/// InputScheme убран (или entity despawned) → отписка
pub fn unbind_removed_schemes(
    mut removed: RemovedComponents<InputScheme>,
    mut subscriptions: ResMut<ActionSubscriptions>,
) {
    for entity in removed.read() {
        if subscriptions.unsubscribe(entity) {
            logger::log_info(&format!("Input: {:?} unsubscribed", entity));
        }
    }
}

/// Device state → action события всех подписчиков
pub fn dispatch_player_input(
    devices: Res<DeviceState>,
    mut subscriptions: ResMut<ActionSubscriptions>,
    mut actions: EventWriter<InputActionEvent>,
    mut movement: EventWriter<MovementInputEvent>,
    mut jumps: EventWriter<JumpPressed>,
    mut lifts: EventWriter<LiftPressed>,
) {
    for (&entity, subscription) in subscriptions.by_entity.iter_mut() {
        for (resolved, last) in subscription.scheme.actions.iter().zip(subscription.values.iter_mut()) {
            let value = devices.evaluate(resolved);

            for &phase in phase_transitions(resolved.kind, *last, value) {
                actions.write(InputActionEvent {
                    entity,
                    action: resolved.action,
                    phase,
                    value,
                });

                match (resolved.action, phase) {
                    (PlayerAction::Movement, _) => {
                        movement.write(MovementInputEvent { entity, value });
                    }
                    (PlayerAction::Jump, ActionPhase::Performed) => {
                        jumps.write(JumpPressed { entity });
                    }
                    (PlayerAction::Lift, ActionPhase::Performed) => {
                        lifts.write(LiftPressed { entity });
                    }
                    _ => {}
                }
            }

            *last = value;
        }
    }
}
