//! Physics backends для локомоции
//!
//! Controller не знает о физике: backend снимает grounded/probe/контакты
//! (LocomotionSet::Sense) и применяет displacement (LocomotionSet::Apply).
//! - ground_plane: аналитическая плоскость (headless, тесты)
//! - rapier_backend: Rapier KinematicCharacterController (Rapier step в FixedPostUpdate)

pub mod collision;
pub mod ground_plane;
pub mod rapier_backend;

// Re-export основных типов
pub use collision::{environment_groups, ground_probe_groups, player_groups, ENVIRONMENT_GROUP, PLAYER_GROUP};
pub use ground_plane::{GroundPlane, GroundPlanePlugin, SlopeOverride, GROUND_SKIN};
pub use rapier_backend::{
    player_body, player_contact, separate_overlapping_players, RapierGroundProbe, RapierLocomotionPlugin,
    CAPSULE_HALF_HEIGHT,
};
