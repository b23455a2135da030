use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Temperatures [`Room::draft`] falls back to when none are given.
pub const DRAFT_CURRENT_TEMPERATURE: f64 = 22.0;
pub const DRAFT_TARGET_TEMPERATURE: f64 = 20.0;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
    #[serde(default)]
    pub windows: Option<Vec<Window>>,
}

impl Room {
    /// Room to be sent through `create`. The id is a local placeholder
    /// (epoch millis); the server assigns the real one.
    pub fn draft(name: impl Into<String>, current: Option<f64>, target: Option<f64>) -> Self {
        Self {
            id: Utc::now().timestamp_millis(),
            name: name.into(),
            current_temperature: Some(current.unwrap_or(DRAFT_CURRENT_TEMPERATURE)),
            target_temperature: Some(target.unwrap_or(DRAFT_TARGET_TEMPERATURE)),
            windows: Some(Vec::new()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum WindowStatus {
    #[serde(alias = "OPEN")]
    Opened,
    Closed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub id: i64,
    pub name: String,
    pub room_name: String,
    pub room_id: i64,
    #[serde(alias = "status")]
    pub window_status: WindowStatus,
}

/// Payload of window mutations. Nothing sends it yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WindowCommand {
    pub name: String,
    pub status: WindowStatus,
}

/// Server-side fields the rooms API requires but the client never edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDefaults {
    pub floor: i32,
    pub building_id: i64,
}

impl Default for CommandDefaults {
    fn default() -> Self {
        Self { floor: 1, building_id: -10 }
    }
}

/// Body of `POST /rooms` and `PUT /rooms/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomCommand {
    pub name: String,
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
    pub floor: i32,
    pub building_id: i64,
}

impl RoomCommand {
    pub fn from_room(room: &Room, defaults: CommandDefaults) -> Self {
        Self {
            name: room.name.clone(),
            current_temperature: room.current_temperature,
            target_temperature: room.target_temperature.map(round_to_tenth),
            floor: defaults.floor,
            building_id: defaults.building_id,
        }
    }
}

/// Half-up rounding to one decimal place: `21.37 -> 21.4`, `21.34 -> 21.3`.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
