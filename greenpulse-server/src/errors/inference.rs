#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Frame could not be encoded: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Inference request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Inference service answered with status {0}")]
    BadStatus(u16),

    #[error("Malformed inference response: {0}")]
    Malformed(String),
}
