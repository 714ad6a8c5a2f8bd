//! Input action asset
//!
//! Декларативное описание управления (JSON): action maps, actions,
//! bindings с группами и control schemes. Для конкретной схемы
//! asset "резолвится" в плоский список биндингов на action.

use bevy::prelude::*;
use serde::Deserialize;

use crate::error::ConfigError;

/// Встроенный asset управления игроком
pub const PLAYER_CONTROLS_JSON: &str = include_str!("../../assets/input/player_controls.json");

/// Action map игрока
pub const PLAYER_MAP: &str = "Player";

/// Действия игрока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub enum PlayerAction {
    Movement,
    Jump,
    Lift,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 3] = [PlayerAction::Movement, PlayerAction::Jump, PlayerAction::Lift];

    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "Movement" => Ok(PlayerAction::Movement),
            "Jump" => Ok(PlayerAction::Jump),
            "Lift" => Ok(PlayerAction::Lift),
            other => Err(ConfigError::UnknownAction(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlayerAction::Movement => "Movement",
            PlayerAction::Jump => "Jump",
            PlayerAction::Lift => "Lift",
        }
    }
}

/// PassThrough - каждое изменение значения; Button - нажатие/отпускание
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Reflect)]
pub enum ActionKind {
    PassThrough,
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ControlType {
    Vector2,
    Button,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub expected_control_type: ControlType,
}

/// Один биндинг как в asset: обычный, заголовок composite или его часть
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindingDef {
    /// Для частей composite: up/down/left/right
    pub name: String,
    pub path: String,
    /// Группы через ';' (пусто = все схемы)
    pub groups: String,
    pub action: String,
    pub is_composite: bool,
    pub is_part_of_composite: bool,
}

impl BindingDef {
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.is_empty() || self.groups.split(';').any(|g| g == group)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionMap {
    pub name: String,
    pub actions: Vec<ActionDef>,
    pub bindings: Vec<BindingDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSchemeDef {
    pub name: String,
    pub binding_group: String,
    #[serde(default)]
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputActionAsset {
    pub name: String,
    pub maps: Vec<ActionMap>,
    pub control_schemes: Vec<ControlSchemeDef>,
}

/// Части 2D composite (каждая - список путей кнопок)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeParts {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl CompositeParts {
    fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty() && self.left.is_empty() && self.right.is_empty()
    }
}

/// Биндинг после резолва под схему
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Кнопка (pressed = 1)
    Button(String),
    /// Стик (Vector2 как есть)
    Stick(String),
    /// 2D vector из четырёх кнопок
    Composite(CompositeParts),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAction {
    pub action: PlayerAction,
    pub kind: ActionKind,
    pub bindings: Vec<Binding>,
}

/// Все действия map'а под одну control scheme
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScheme {
    pub scheme: String,
    pub actions: Vec<ResolvedAction>,
}

impl InputActionAsset {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Встроенный asset (Controller1/Controller2/Pleikka/Kaikkitomii)
    pub fn player_controls() -> Result<Self, ConfigError> {
        Self::from_json(PLAYER_CONTROLS_JSON)
    }

    pub fn scheme(&self, name: &str) -> Result<&ControlSchemeDef, ConfigError> {
        self.control_schemes
            .iter()
            .find(|scheme| scheme.name == name)
            .ok_or_else(|| ConfigError::UnknownControlScheme(name.to_string()))
    }

    pub fn map(&self, name: &str) -> Result<&ActionMap, ConfigError> {
        self.maps
            .iter()
            .find(|map| map.name == name)
            .ok_or_else(|| ConfigError::UnknownAction(name.to_string()))
    }

    /// Биндинги map'а, отфильтрованные по группе схемы
    ///
    /// Composite: заголовок открывает composite, следующие за ним части
    /// собираются в него. Composite без частей в этой схеме отбрасывается.
    pub fn resolve(&self, map_name: &str, scheme_name: &str) -> Result<ResolvedScheme, ConfigError> {
        let map = self.map(map_name)?;
        let group = &self.scheme(scheme_name)?.binding_group;

        let mut actions = Vec::with_capacity(map.actions.len());
        for def in &map.actions {
            actions.push(ResolvedAction {
                action: PlayerAction::from_name(&def.name)?,
                kind: def.kind,
                bindings: Vec::new(),
            });
        }

        let mut open_composite: Option<(usize, CompositeParts)> = None;
        for binding in &map.bindings {
            if binding.is_part_of_composite {
                let Some((_, parts)) = open_composite.as_mut() else {
                    continue;
                };
                if !binding.in_group(group) {
                    continue;
                }
                let slot = match binding.name.as_str() {
                    "up" => &mut parts.up,
                    "down" => &mut parts.down,
                    "left" => &mut parts.left,
                    "right" => &mut parts.right,
                    _ => continue,
                };
                slot.push(binding.path.clone());
                continue;
            }

            close_composite(&mut actions, open_composite.take());

            let index = action_index(&actions, &binding.action)?;
            if binding.is_composite {
                open_composite = Some((index, CompositeParts::default()));
            } else if binding.in_group(group) {
                let resolved = match map.actions[index].expected_control_type {
                    ControlType::Vector2 => Binding::Stick(binding.path.clone()),
                    ControlType::Button => Binding::Button(binding.path.clone()),
                };
                actions[index].bindings.push(resolved);
            }
        }
        close_composite(&mut actions, open_composite);

        Ok(ResolvedScheme {
            scheme: scheme_name.to_string(),
            actions,
        })
    }
}

fn action_index(actions: &[ResolvedAction], name: &str) -> Result<usize, ConfigError> {
    let action = PlayerAction::from_name(name)?;
    actions
        .iter()
        .position(|resolved| resolved.action == action)
        .ok_or_else(|| ConfigError::UnknownAction(name.to_string()))
}

fn close_composite(actions: &mut [ResolvedAction], composite: Option<(usize, CompositeParts)>) {
    if let Some((index, parts)) = composite {
        if !parts.is_empty() {
            actions[index].bindings.push(Binding::Composite(parts));
        }
    }
}
