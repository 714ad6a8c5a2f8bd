//! Player marker component
//!
//! Отмечает entity которым управляет игрок (и которую другие игроки
//! распознают как "player" при стакинге - стоять на голове нельзя прыгать).

use bevy::prelude::Component;

/// Marker component для player-controlled entity
///
/// # Архитектурная заметка
/// - Input dispatch пишет события только для подписанных Player entity
/// - Contact обработка проверяет `Player` у второй стороны контакта
///   (замена tag == "player")
///
/// # Co-op
/// Два игрока на одной клавиатуре: у каждого свой control scheme
/// (см. `input::ActionSubscriptions`).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
