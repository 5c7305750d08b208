use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Image not available. Check camera or internet connection.")]
    ImageUnavailable,
}

impl RoomError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RoomError::RoomNotFound => StatusCode::NOT_FOUND,
            RoomError::ImageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
