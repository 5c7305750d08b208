use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handles::*;
use crate::services::OccupancyService;

pub fn create_app(occupancy: Arc<OccupancyService>) -> Router {
    let state = OccupancyState { occupancy };

    let rooms = Router::new()
        .route("/", get(get_rooms))
        .route("/:code", get(get_room))
        .with_state(state.clone());

    let snapshots = Router::new()
        .route("/:code", get(get_snapshot))
        .with_state(state.clone());

    Router::new()
        .nest("/rooms", rooms)
        .nest("/snapshot", snapshots)
        .route("/alerts", get(get_alerts))
        .route("/summary", get(get_summary))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
