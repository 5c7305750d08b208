#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture device unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("Capture device answered with status {0}")]
    BadStatus(u16),

    #[error("Captured frame could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}
