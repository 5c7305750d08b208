use std::sync::Arc;

use image::DynamicImage;

use crate::errors::RoomError;
use crate::models::alert::{AlertEvent, AlertKind};
use crate::models::room::{RoomRecord, RoomUpdate, Source, StatusChange};
use crate::models::summary::Summary;
use crate::services::alert_service::AlertService;
use crate::services::frame_service::FrameService;
use crate::services::room_store::RoomStore;

/// Entry point for reading room state and for applying updates to it.
///
/// Every update goes through [`OccupancyService::apply`], which raises a
/// warning whenever a room enters the waste state.
pub struct OccupancyService {
    store: Arc<RoomStore>,
    alerts: Arc<AlertService>,
    frames: Arc<FrameService>,
}

impl OccupancyService {
    pub fn new(store: Arc<RoomStore>, alerts: Arc<AlertService>, frames: Arc<FrameService>) -> Self {
        Self {
            store,
            alerts,
            frames,
        }
    }

    pub async fn list_rooms(&self) -> Vec<RoomRecord> {
        self.store.list().await
    }

    pub async fn get_room(&self, code: &str) -> Result<RoomRecord, RoomError> {
        self.store.get(code).await
    }

    pub async fn list_alerts(&self) -> Vec<AlertEvent> {
        self.alerts.list().await
    }

    pub async fn summary(&self) -> Summary {
        Summary::from_records(&self.store.list().await)
    }

    pub async fn get_latest_frame(&self, code: &str) -> Result<Arc<DynamicImage>, RoomError> {
        self.store.config(code)?;
        self.frames.latest_frame(code).await
    }

    pub fn frames(&self) -> &Arc<FrameService> {
        &self.frames
    }

    pub async fn set_fixtures(&self, code: &str, lights: bool, ac: bool) -> Result<StatusChange, RoomError> {
        self.apply(code, RoomUpdate::fixtures(lights, ac)).await
    }

    pub async fn apply(&self, code: &str, update: RoomUpdate) -> Result<StatusChange, RoomError> {
        let source = update.source;
        let change = self.store.update(code, update).await?;

        if change.entered_waste() {
            let room = self.store.config(code)?;
            self.alerts
                .record(AlertKind::Warning, &room.code, &room.name, waste_message(source))
                .await;

            tracing::warn!("waste alert triggered for {}", room.code);
        }

        Ok(change)
    }
}

fn waste_message(source: Option<Source>) -> &'static str {
    match source {
        Some(Source::DemoSimulated) => "Demo: Room empty but AC/Lights ON.",
        Some(Source::LocalFallback) => {
            "Room is empty but lights/AC are still ON. Energy waste detected by local camera analysis."
        }
        Some(_) => "Room is empty but lights/AC are still ON. Energy waste detected by Vision AI.",
        None => "Room is empty but lights/AC were switched ON.",
    }
}
