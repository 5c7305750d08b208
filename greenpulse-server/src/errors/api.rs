use super::RoomError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Room error: {0}")]
    RoomError(#[from] RoomError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
