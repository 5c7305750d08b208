use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

use super::OccupancyState;
use crate::errors::ApiError;
use crate::models::room::RoomStatus;
use crate::services::frame_service::{SNAPSHOT_JPEG_QUALITY, encode_jpeg};

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotBody {
    pub room_id: String,
    pub room_name: String,
    pub image_base64: String,
    pub image_source: String,
    pub is_live: bool,
    pub occupancy: u32,
    pub capacity: u32,
    pub status: RoomStatus,
    pub confidence: f64,
    pub timestamp: String,
}

pub async fn get_snapshot(
    Path(code): Path<String>,
    State(state): State<OccupancyState>,
) -> Result<impl IntoResponse, ApiError> {
    let room = state.occupancy.get_room(&code).await?;
    let frame = state.occupancy.get_latest_frame(&room.code).await?;

    let image_base64 = tokio::task::spawn_blocking(move || {
        encode_jpeg(&frame, SNAPSHOT_JPEG_QUALITY).map(|bytes| STANDARD.encode(bytes))
    })
    .await
    .map_err(anyhow::Error::from)?
    .map_err(anyhow::Error::from)?;

    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());

    Ok(Json(SnapshotBody {
        room_id: room.code,
        room_name: room.name,
        image_base64,
        image_source: "webcam_live".to_string(),
        is_live: true,
        occupancy: room.occupancy,
        capacity: room.capacity,
        status: room.status,
        confidence: room.confidence,
        timestamp: now
            .format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_default(),
    }))
}
