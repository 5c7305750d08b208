use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::models::room::RoomConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scanner {
    pub monitored_room: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    pub camera: Option<Camera>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vision {
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalDetector {
    pub scale_factor: f32,
    pub min_neighbors: usize,
    pub min_window: u32,
}

impl Default for LocalDetector {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_window: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub scanner: Scanner,
    pub vision: Vision,
    #[serde(default)]
    pub local_detector: LocalDetector,
    pub rooms: Vec<RoomConfig>,
}

fn default_interval_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    5
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scanner.interval_secs == 0 {
            return Err(ConfigError::Message("scanner.interval_secs must be positive".into()));
        }

        if let Some(room) = self.rooms.iter().find(|room| room.capacity == 0) {
            return Err(ConfigError::Message(format!(
                "room {} must have a positive capacity",
                room.code
            )));
        }

        for (index, room) in self.rooms.iter().enumerate() {
            if self.rooms[..index].iter().any(|other| other.code.eq_ignore_ascii_case(&room.code)) {
                return Err(ConfigError::Message(format!("duplicate room code {}", room.code)));
            }
        }

        let monitored = &self.scanner.monitored_room;
        if !self.rooms.iter().any(|room| room.code.eq_ignore_ascii_case(monitored)) {
            return Err(ConfigError::Message(format!(
                "monitored room {monitored} is not in the room catalogue"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn shipped_defaults() -> Settings {
        Config::builder()
            .add_source(File::from_str(
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../configs/default.toml")),
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_configuration_is_valid() {
        let settings = shipped_defaults();

        assert!(settings.validate().is_ok());
        assert_eq!(settings.scanner.interval_secs, 5);
        assert_eq!(settings.vision.timeout_secs, 5);
        assert_eq!(settings.rooms.len(), 6);
        assert!(settings.scanner.camera.is_none());
    }

    #[test]
    fn test_monitored_room_must_exist() {
        let mut settings = shipped_defaults();
        settings.scanner.monitored_room = "Z9".into();

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_duplicate_codes_are_rejected() {
        let mut settings = shipped_defaults();
        let mut duplicate = settings.rooms[0].clone();
        duplicate.code = duplicate.code.to_lowercase();
        settings.rooms.push(duplicate);

        assert!(settings.validate().is_err());
    }
}
