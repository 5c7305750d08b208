use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertKind {
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub room_id: String,
    pub room_name: String,
    pub message: String,
    /// Local wall clock as `HH:MM`.
    pub time: String,
    #[serde(with = "time::serde::rfc3339")]
    pub raised_at: OffsetDateTime,
}

impl AlertEvent {
    pub fn new(kind: AlertKind, room_id: &str, room_name: &str, message: &str) -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let raised_at = now.replace_second(0).unwrap_or(now).replace_nanosecond(0).unwrap_or(now);

        Self {
            kind,
            room_id: room_id.to_string(),
            room_name: room_name.to_string(),
            message: message.to_string(),
            time: raised_at
                .format(format_description!("[hour]:[minute]"))
                .unwrap_or_default(),
            raised_at,
        }
    }
}
