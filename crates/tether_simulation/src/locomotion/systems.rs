//! Locomotion ECS системы
//!
//! Тонкий слой над `Locomotion`: достаём коллабораторы из мира,
//! передаём в controller явно, результат пишем в staging компоненты.

use bevy::prelude::*;

use super::collaborators::CarryQuery;
use super::controller::{JumpContext, JumpOutcome, Locomotion, TickInput};
use super::events::{GroundContactEvent, JumpPressed, Jumped, MovementInputEvent};
use super::sensors::{GroundProbeSample, GroundSensor, PendingDisplacement};
use crate::audio::RandomSoundPlayer;
use crate::components::{AnimationTriggers, CameraRig, CarryCable, JumpSounds, SoundPlayed};
use crate::error::ConfigError;
use crate::logger;
use crate::DeterministicRng;

/// Attach-time проверка: конфиг валиден, коллабораторы на месте
///
/// Ошибка фатальна (default error handler Bevy паникует) - как
/// отсутствующий компонент на старте сцены.
pub fn validate_locomotion_setup(
    added: Query<(Entity, &Locomotion, Has<AnimationTriggers>, Has<JumpSounds>), Added<Locomotion>>,
) -> Result {
    for (entity, locomotion, has_triggers, has_sounds) in added.iter() {
        let missing = if !has_triggers {
            Some("AnimationTriggers")
        } else if !has_sounds {
            Some("JumpSounds")
        } else {
            None
        };

        if let Some(component) = missing {
            logger::log_error(&format!("Locomotion on {:?}: missing {}", entity, component));
            return Err(ConfigError::MissingCollaborator { entity, component }.into());
        }

        if let Err(err) = locomotion.config.validate() {
            logger::log_error(&format!("Locomotion on {:?}: {}", entity, err));
            return Err(err.into());
        }

        logger::log(&format!("Locomotion attached to {:?}", entity));
    }

    Ok(())
}

/// Коллаборатор снят с уже работающего контроллера
///
/// Без AnimationTriggers/JumpSounds entity молча выпадает из запросов
/// tick и jump, поэтому это такая же фатальная ошибка, как на attach.
/// Despawn целиком не считается (Locomotion уже нет).
pub fn validate_collaborators_retained(
    mut removed_triggers: RemovedComponents<AnimationTriggers>,
    mut removed_sounds: RemovedComponents<JumpSounds>,
    players: Query<(Has<AnimationTriggers>, Has<JumpSounds>), With<Locomotion>>,
) -> Result {
    let removed = removed_triggers.read().chain(removed_sounds.read());
    for entity in removed {
        let Ok((has_triggers, has_sounds)) = players.get(entity) else {
            continue;
        };

        let component = match (has_triggers, has_sounds) {
            (false, _) => "AnimationTriggers",
            (_, false) => "JumpSounds",
            _ => continue,
        };
        logger::log_error(&format!("Locomotion on {:?}: {} removed after attach", entity, component));
        return Err(ConfigError::MissingCollaborator { entity, component }.into());
    }

    Ok(())
}

/// Контакты прошлого перемещения → debounce стакинга / slide
pub fn apply_ground_contacts(
    mut contacts: EventReader<GroundContactEvent>,
    mut players: Query<&mut Locomotion>,
) {
    for event in contacts.read() {
        if let Ok(mut locomotion) = players.get_mut(event.entity) {
            locomotion.on_ground_contact(event.contact);
        }
    }
}

/// Movement input (все фазы) → сохраняем сырое значение
pub fn apply_movement_input(
    mut inputs: EventReader<MovementInputEvent>,
    mut players: Query<&mut Locomotion>,
) {
    for event in inputs.read() {
        if let Ok(mut locomotion) = players.get_mut(event.entity) {
            locomotion.on_movement_input(event.value);
        }
    }
}

/// Jump pressed → single/double jump
///
/// Звуки копятся в RandomSoundPlayer и уходят SoundPlayed событиями
/// в порядке проигрывания.
pub fn handle_jump_pressed(
    mut presses: EventReader<JumpPressed>,
    mut players: Query<(&mut Locomotion, &mut AnimationTriggers, &JumpSounds, Option<&CarryCable>)>,
    mut rng: ResMut<DeterministicRng>,
    mut sounds: EventWriter<SoundPlayed>,
    mut jumped: EventWriter<Jumped>,
) {
    for event in presses.read() {
        let Ok((mut locomotion, mut triggers, sound_bank, carry)) = players.get_mut(event.entity) else {
            continue;
        };

        let mut player = RandomSoundPlayer::new(&mut rng.rng, event.entity);
        let outcome = locomotion.on_jump_pressed(&mut JumpContext {
            animation: &mut *triggers,
            sounds: &mut player,
            sound_bank,
            carry: carry.map(|cable| cable as &dyn CarryQuery),
        });

        sounds.write_batch(player.played);
        if outcome != JumpOutcome::Ignored {
            jumped.write(Jumped { entity: event.entity, outcome });
        }
    }
}

/// Per-frame tick всех контроллеров
///
/// Camera rig обязателен как только есть хотя бы один игрок.
pub fn tick_locomotion(
    time: Res<Time<Fixed>>,
    cameras: Query<&Transform, (With<CameraRig>, Without<Locomotion>)>,
    mut players: Query<(
        &mut Locomotion,
        &mut Transform,
        &GroundSensor,
        &GroundProbeSample,
        &mut AnimationTriggers,
        &mut PendingDisplacement,
    )>,
) -> Result {
    if players.is_empty() {
        return Ok(());
    }

    let camera = cameras.single().map_err(|_| ConfigError::MissingCameraRig)?;
    let delta = time.delta_secs();

    for (mut locomotion, mut transform, sensor, sample, mut triggers, mut pending) in players.iter_mut() {
        let input = TickInput {
            delta,
            grounded: sensor.grounded,
            position: transform.translation,
        };
        let output = locomotion.tick(input, sample, camera, &mut *triggers);

        pending.0 = output.displacement;
        if let Some(facing) = output.facing {
            transform.look_to(facing, Vec3::Y);
        }
    }

    Ok(())
}
