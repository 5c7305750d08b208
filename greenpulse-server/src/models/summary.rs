use serde::{Deserialize, Serialize};

use crate::models::room::{RoomRecord, RoomStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_rooms: usize,
    pub occupied: usize,
    pub waste: usize,
    pub empty: usize,
    pub waste_rooms: Vec<String>,
}

impl Summary {
    pub fn from_records(records: &[RoomRecord]) -> Self {
        let count = |status: RoomStatus| records.iter().filter(|r| r.status == status).count();

        Self {
            total_rooms: records.len(),
            occupied: count(RoomStatus::Occupied),
            waste: count(RoomStatus::Waste),
            empty: count(RoomStatus::Empty),
            waste_rooms: records
                .iter()
                .filter(|r| r.status == RoomStatus::Waste)
                .map(|r| r.code.clone())
                .collect(),
        }
    }
}
