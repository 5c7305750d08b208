use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::errors::RoomError;
use crate::models::room::{RoomConfig, RoomRecord, RoomState, RoomUpdate, StatusChange};

/// Owns the live state of every room in the catalogue.
///
/// Static catalogue data is immutable and kept apart from the live half; the
/// two are joined into a [`RoomRecord`] on read. Each update runs under one
/// write lock, so readers never observe a partially applied cycle.
pub struct RoomStore {
    catalogue: Vec<RoomConfig>,
    index: HashMap<String, usize>,
    states: RwLock<Vec<RoomState>>,
}

impl RoomStore {
    pub fn new(catalogue: Vec<RoomConfig>, monitored_room: &str) -> Self {
        let index = catalogue
            .iter()
            .enumerate()
            .map(|(position, room)| (normalize(&room.code), position))
            .collect();

        let states = catalogue
            .iter()
            .map(|room| RoomState::initial(room, room.code.eq_ignore_ascii_case(monitored_room)))
            .collect();

        Self {
            catalogue,
            index,
            states: RwLock::new(states),
        }
    }

    pub async fn get(&self, code: &str) -> Result<RoomRecord, RoomError> {
        let position = self.position(code)?;
        let states = self.states.read().await;

        Ok(RoomRecord::join(&self.catalogue[position], &states[position]))
    }

    pub async fn list(&self) -> Vec<RoomRecord> {
        let states = self.states.read().await;

        self.catalogue
            .iter()
            .zip(states.iter())
            .map(|(config, state)| RoomRecord::join(config, state))
            .collect()
    }

    /// Applies a partial update and reports the status transition it caused.
    pub async fn update(&self, code: &str, update: RoomUpdate) -> Result<StatusChange, RoomError> {
        let position = self.position(code)?;
        let mut states = self.states.write().await;

        Ok(states[position].apply(&update))
    }

    pub fn config(&self, code: &str) -> Result<&RoomConfig, RoomError> {
        self.position(code).map(|position| &self.catalogue[position])
    }

    fn position(&self, code: &str) -> Result<usize, RoomError> {
        self.index
            .get(&normalize(code))
            .copied()
            .ok_or(RoomError::RoomNotFound)
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
