use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::errors::ApiError;
use crate::services::OccupancyService;

#[derive(Clone)]
pub struct OccupancyState {
    pub occupancy: Arc<OccupancyService>,
}

pub async fn get_rooms(State(state): State<OccupancyState>) -> impl IntoResponse {
    Json(state.occupancy.list_rooms().await)
}

pub async fn get_room(
    Path(code): Path<String>,
    State(state): State<OccupancyState>,
) -> Result<impl IntoResponse, ApiError> {
    let room = state.occupancy.get_room(&code).await?;

    Ok(Json(room))
}

pub async fn get_summary(State(state): State<OccupancyState>) -> impl IntoResponse {
    Json(state.occupancy.summary().await)
}
