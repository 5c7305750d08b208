use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use super::OccupancyState;

pub async fn get_alerts(State(state): State<OccupancyState>) -> impl IntoResponse {
    Json(state.occupancy.list_alerts().await)
}
