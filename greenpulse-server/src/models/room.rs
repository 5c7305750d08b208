use serde::{Deserialize, Serialize};

use crate::services::status::determine_status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Occupied,
    Waste,
    Empty,
}

/// Provenance of the occupancy value currently held for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Static,
    VisionAi,
    LocalFallback,
    DemoSimulated,
    Pending,
}

/// Static catalogue entry, loaded once from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    pub code: String,
    pub name: String,
    pub capacity: u32,
    pub energy: u32,
    #[serde(default)]
    pub lights: bool,
    #[serde(default)]
    pub ac: bool,
    #[serde(default)]
    pub occupancy: u32,
    #[serde(default)]
    pub confidence: f64,
}

/// Live, mutable half of a room. Status is derived, never assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomState {
    occupancy: u32,
    lights: bool,
    ac: bool,
    confidence: f64,
    source: Source,
    status: RoomStatus,
}

impl RoomState {
    pub fn initial(config: &RoomConfig, monitored: bool) -> Self {
        let source = if monitored { Source::Pending } else { Source::Static };

        Self {
            occupancy: config.occupancy,
            lights: config.lights,
            ac: config.ac,
            confidence: config.confidence,
            source,
            status: determine_status(config.occupancy, config.lights, config.ac),
        }
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    pub fn lights(&self) -> bool {
        self.lights
    }

    pub fn ac(&self) -> bool {
        self.ac
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    /// Applies the present fields of `update` and recomputes the status.
    pub fn apply(&mut self, update: &RoomUpdate) -> StatusChange {
        let previous = self.status;

        if let Some(occupancy) = update.occupancy {
            self.occupancy = occupancy;
        }
        if let Some(confidence) = update.confidence {
            self.confidence = confidence;
        }
        if let Some(source) = update.source {
            self.source = source;
        }
        if let Some(lights) = update.lights {
            self.lights = lights;
        }
        if let Some(ac) = update.ac {
            self.ac = ac;
        }

        self.status = determine_status(self.occupancy, self.lights, self.ac);

        StatusChange {
            previous,
            current: self.status,
        }
    }
}

/// Partial update of a room's live state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomUpdate {
    pub occupancy: Option<u32>,
    pub confidence: Option<f64>,
    pub source: Option<Source>,
    pub lights: Option<bool>,
    pub ac: Option<bool>,
}

impl RoomUpdate {
    pub fn detection(occupancy: u32, confidence: f64, source: Source) -> Self {
        Self {
            occupancy: Some(occupancy),
            confidence: Some(confidence),
            source: Some(source),
            ..Default::default()
        }
    }

    pub fn fixtures(lights: bool, ac: bool) -> Self {
        Self {
            lights: Some(lights),
            ac: Some(ac),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub previous: RoomStatus,
    pub current: RoomStatus,
}

impl StatusChange {
    pub fn entered_waste(&self) -> bool {
        self.previous != RoomStatus::Waste && self.current == RoomStatus::Waste
    }
}

/// Read model handed to consumers: catalogue data joined with live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub code: String,
    pub name: String,
    pub occupancy: u32,
    pub capacity: u32,
    pub status: RoomStatus,
    pub lights: bool,
    pub ac: bool,
    pub energy: u32,
    pub confidence: f64,
    pub source: Source,
}

impl RoomRecord {
    pub fn join(config: &RoomConfig, state: &RoomState) -> Self {
        Self {
            code: config.code.clone(),
            name: config.name.clone(),
            occupancy: state.occupancy(),
            capacity: config.capacity,
            status: state.status(),
            lights: state.lights(),
            ac: state.ac(),
            energy: config.energy,
            confidence: state.confidence(),
            source: state.source(),
        }
    }
}
