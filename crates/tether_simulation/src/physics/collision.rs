//! Collision groups
//!
//! Слой игроков отдельный: slope probe его исключает (стоя на голове
//! другого игрока, склон считается по окружению, а не по его capsule).

use bevy_rapier3d::prelude::*;

/// Capsule игроков
pub const PLAYER_GROUP: Group = Group::GROUP_1;

/// Статичное окружение (пол, склоны, платформы)
pub const ENVIRONMENT_GROUP: Group = Group::GROUP_2;

/// Игроки коллайдят с окружением и друг с другом (стакинг)
pub fn player_groups() -> CollisionGroups {
    CollisionGroups::new(PLAYER_GROUP, PLAYER_GROUP | ENVIRONMENT_GROUP)
}

pub fn environment_groups() -> CollisionGroups {
    CollisionGroups::new(ENVIRONMENT_GROUP, Group::ALL)
}

/// Фильтр slope probe: всё кроме игроков
pub fn ground_probe_groups() -> CollisionGroups {
    CollisionGroups::new(Group::ALL, Group::ALL.difference(PLAYER_GROUP))
}
