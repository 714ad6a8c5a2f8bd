//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - player: маркер игрока (тег "player" для стакинга)
//! - camera: CameraRig (источник camera-relative basis)
//! - carry: CarryCable (carry mechanic, блокирует double jump)
//! - animation: fire-once триггеры + Animator state machine
//! - audio: звуковые банки прыжков и SoundPlayed событие

pub mod player;
pub mod camera;
pub mod carry;
pub mod animation;
pub mod audio;

// Re-exports для удобного импорта
pub use player::*;
pub use camera::*;
pub use carry::*;
pub use animation::*;
pub use audio::*;
