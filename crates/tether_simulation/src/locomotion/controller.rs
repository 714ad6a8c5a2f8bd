//! Locomotion controller (third-person)
//!
//! Архитектура:
//! - Чистая логика без ECS: state + config, все коллабораторы передаются явно
//! - Velocity интегрируем сами (не физические силы), физика только
//!   применяет итоговое displacement и сообщает grounded/контакты
//! - Coyote time + двухкадровый debounce стакинга сглаживают
//!   однокадровые несостыковки физики (пропущенный контакт при приземлении)
//!
//! Порядок вызовов за кадр (хост гарантирует):
//! 1. on_ground_contact (контакты перемещения прошлого tick)
//! 2. on_movement_input / on_jump_pressed (input события)
//! 3. tick

use bevy::prelude::*;

use super::collaborators::{AnimationSink, CameraBasis, CarryQuery, GroundProbe, SoundPlayer};
use super::sensors::{GroundProbeSample, GroundSensor, PendingDisplacement};
use super::slope::evaluate_slope;
use crate::components::{AnimationTrigger, JumpSounds};
use crate::config::LocomotionConfig;
use crate::logger;

/// Минимальное превышение (m) над другим игроком, чтобы считаться "стоящим на нём"
pub const STACK_HEIGHT_THRESHOLD: f32 = 1.0;

/// Внутреннее состояние локомоции (мутируется раз в tick)
///
/// Инварианты:
/// - `can_double_jump` true только между одиночным прыжком и
///   (a) double jump или (b) grounded кадром с velocity.y <= 0
/// - `PlayerGrounded` = coyote_timer > 0 && !above_other_player_last_frame && !steep_sliding
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct LocomotionState {
    /// World-space velocity. y - аккумулятор гравитации, x/z пересчитываются каждый tick
    pub velocity: Vec3,
    /// Физический контакт с землёй в этом tick
    pub grounded: bool,
    /// Может уходить слегка в минус (не клампим), `> 0` = ещё grounded
    pub coyote_timer: f32,
    pub can_double_jump: bool,
    pub steep_sliding: bool,
    /// Ненулевое значение перебивает input (склон или спихивание с другого игрока)
    pub slide_direction: Vec3,
    pub above_other_player_last_frame: bool,
    pub above_other_player_current_frame: bool,
    /// Последний 2D input, [-1, 1] по осям (не нормализован)
    pub movement_input: Vec2,
}

/// Контакт из физики (один на столкновение за перемещение)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// Нормаль контакта (от другой поверхности к нам)
    pub normal: Vec3,
    /// Вторая сторона контакта - игрок?
    pub other_is_player: bool,
    /// other.y - self.y
    pub other_vertical_offset: f32,
}

/// Что произошло при нажатии прыжка
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    Single,
    Double,
    /// В воздухе без double jump - no-op
    Ignored,
}

/// Коллабораторы для jump (звук, анимация, carry mechanic)
pub struct JumpContext<'a> {
    pub animation: &'a mut dyn AnimationSink,
    pub sounds: &'a mut dyn SoundPlayer,
    pub sound_bank: &'a JumpSounds,
    /// None - carry mechanic отсутствует (= не несёт)
    pub carry: Option<&'a dyn CarryQuery>,
}

/// Входные данные tick от хоста
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    pub delta: f32,
    /// Физический grounded после последнего перемещения
    pub grounded: bool,
    /// Позиция основания персонажа
    pub position: Vec3,
}

/// Результат tick: что хост должен применить
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Суммарное displacement за tick (горизонталь + вертикаль)
    pub displacement: Vec3,
    /// Новое направление взгляда (только от input, не от slide)
    pub facing: Option<Vec3>,
}

/// Locomotion controller компонент
///
/// Staging компоненты (sensor, probe sample, displacement) добавляются
/// автоматически; коллабораторы (AnimationTriggers, JumpSounds) - нет,
/// их отсутствие ловит attach-time валидация.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, GroundSensor, GroundProbeSample, PendingDisplacement)]
pub struct Locomotion {
    pub config: LocomotionConfig,
    pub state: LocomotionState,
}

impl Locomotion {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            state: LocomotionState::default(),
        }
    }

    /// Сохраняет сырой 2D input (валидации нет - источник сам клампит)
    pub fn on_movement_input(&mut self, input: Vec2) {
        self.state.movement_input = input;
    }

    /// Rising-edge прыжок ("performed", не hold и не release)
    pub fn on_jump_pressed(&mut self, ctx: &mut JumpContext) -> JumpOutcome {
        if self.player_grounded() && !self.state.steep_sliding {
            self.state.coyote_timer = 0.0;

            ctx.sounds.play(&ctx.sound_bank.jump, ctx.sound_bank.chance_to_play);
            ctx.sounds.play_always(&ctx.sound_bank.always_jump);

            self.state.velocity.y = self.single_jump_velocity();

            // Пока несём груз - double jump не взводим
            let carrying = ctx.carry.is_some_and(|carry| carry.is_carrying());
            self.state.can_double_jump = !carrying;

            ctx.animation.reset_trigger(AnimationTrigger::Idle);
            ctx.animation.reset_trigger(AnimationTrigger::Walk);
            ctx.animation.set_trigger(AnimationTrigger::Jump);

            logger::log(&format!(
                "Jump: velocity.y = {:.3}, double jump armed: {}",
                self.state.velocity.y, self.state.can_double_jump
            ));
            JumpOutcome::Single
        } else if self.state.can_double_jump {
            ctx.sounds.play(&ctx.sound_bank.double_jump, ctx.sound_bank.chance_to_play);
            ctx.sounds.play_always(&ctx.sound_bank.always_double_jump);

            self.state.velocity.y = self.double_jump_velocity(self.state.velocity.y);
            self.state.can_double_jump = false;

            ctx.animation.set_trigger(AnimationTrigger::Jump);

            logger::log(&format!("Double jump: velocity.y = {:.3}", self.state.velocity.y));
            JumpOutcome::Double
        } else {
            JumpOutcome::Ignored
        }
    }

    /// Контакт с поверхностью во время перемещения
    ///
    /// Стоим на другом игроке (он ниже минимум на 1m и мы не летим вверх) →
    /// взводим оба флага стакинга и толкаем с его "головы".
    /// Иначе - debounce: прошлый кадр = текущий, текущий сбрасываем.
    pub fn on_ground_contact(&mut self, contact: GroundContact) {
        if contact.other_is_player
            && contact.other_vertical_offset < -STACK_HEIGHT_THRESHOLD
            && self.state.velocity.y <= 0.0
        {
            self.state.above_other_player_last_frame = true;
            self.state.above_other_player_current_frame = true;

            // Убираем из up компоненту вдоль нормали
            self.state.slide_direction = Vec3::Y - contact.normal * Vec3::Y.dot(contact.normal);
        } else {
            self.state.above_other_player_last_frame = self.state.above_other_player_current_frame;
            self.state.above_other_player_current_frame = false;
        }
    }

    /// Grounded для целей прыжка (coyote time + стакинг + склон)
    pub fn player_grounded(&self) -> bool {
        self.state.coyote_timer > 0.0
            && !self.state.above_other_player_last_frame
            && !self.state.steep_sliding
    }

    /// Sliding = есть ненулевое slide direction (крутой склон или спихивание)
    pub fn is_sliding(&self) -> bool {
        self.state.slide_direction != Vec3::ZERO
    }

    pub fn single_jump_velocity(&self) -> f32 {
        (self.config.jump_height * -2.0 * self.config.gravity).sqrt()
    }

    /// Double jump: вверх - фиксированная скорость,
    /// вниз - сначала гасим падение до квадратного корня, потом добавляем импульс
    pub fn double_jump_velocity(&self, current_y: f32) -> f32 {
        let boost =
            (self.config.jump_height * self.config.double_jump_ratio * -2.0 * self.config.gravity).sqrt();
        if current_y >= self.config.descending_threshold {
            boost
        } else {
            -(-current_y).sqrt() + boost
        }
    }

    /// Per-frame update
    ///
    /// 1. Slope probe → steep_sliding / slide_direction
    /// 2. Grounded refill coyote timer
    /// 3. Coyote countdown
    /// 4. Прилипание к земле (velocity.y = bias), disarm double jump
    /// 5-6. Camera-relative движение (или slide)
    /// 7. Facing по input
    /// 8. Гравитация
    /// 9. Walk/Idle триггеры
    pub fn tick(
        &mut self,
        input: TickInput,
        probe: &dyn GroundProbe,
        camera: &dyn CameraBasis,
        animation: &mut dyn AnimationSink,
    ) -> TickOutput {
        let config = self.config;
        let state = &mut self.state;
        state.grounded = input.grounded;

        // 1. Крутой склон
        match evaluate_slope(input.grounded, input.position, probe, &config) {
            Some(direction) => {
                state.steep_sliding = true;
                state.slide_direction = direction;
            }
            None => state.steep_sliding = false,
        }

        // 2. Стоим нормально - заряжаем coyote timer, slide сбрасываем
        if state.grounded
            && state.velocity.y <= 0.0
            && !state.above_other_player_last_frame
            && !state.steep_sliding
        {
            state.coyote_timer = config.coyote_time;
            state.slide_direction = Vec3::ZERO;
        }

        // 3. Без клампа к нулю: слегка отрицательный = истёк
        if state.coyote_timer > 0.0 {
            state.coyote_timer -= input.delta;
        }

        // 4. Держим контакт с землёй
        if state.grounded && state.velocity.y < 0.0 && !state.steep_sliding {
            state.velocity.y = config.grounded_bias;
            state.can_double_jump = false;
        }

        // 5. Camera-relative basis (только горизонталь, не нормализуем)
        let mut camera_forward = camera.forward();
        let mut camera_right = camera.right();
        camera_forward.y = 0.0;
        camera_right.y = 0.0;

        let relative = state.movement_input.y * camera_forward + state.movement_input.x * camera_right;
        let intent = Vec3::new(relative.x, 0.0, relative.z);

        // 6. Slide перебивает input целиком (при спихивании с игрока у slide есть y)
        let move_velocity = if state.slide_direction == Vec3::ZERO {
            config.speed * intent
        } else {
            -config.speed * state.slide_direction
        };
        state.velocity.x = move_velocity.x;
        state.velocity.z = move_velocity.z;

        // 7. Facing только от input
        let facing = (intent != Vec3::ZERO).then_some(intent);

        // 8. Гравитация
        state.velocity.y += config.gravity * input.delta;
        let displacement = move_velocity * input.delta + Vec3::new(0.0, state.velocity.y * input.delta, 0.0);

        // 9. Анимация (только когда grounded для прыжка)
        if self.player_grounded() {
            if self.state.movement_input != Vec2::ZERO {
                animation.reset_trigger(AnimationTrigger::Idle);
                animation.set_trigger(AnimationTrigger::Walk);
            } else {
                animation.reset_trigger(AnimationTrigger::Walk);
                animation.set_trigger(AnimationTrigger::Idle);
            }
        }

        TickOutput { displacement, facing }
    }
}
