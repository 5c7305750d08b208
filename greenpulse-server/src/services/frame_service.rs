use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError};
use tokio::sync::RwLock;

use crate::errors::RoomError;
use crate::services::capture::CaptureSource;

pub const SNAPSHOT_JPEG_QUALITY: u8 = 85;

/// Holds the most recent frame of the monitored room. Only the latest frame
/// is kept.
pub struct FrameService {
    monitored_room: String,
    capture: Option<Arc<dyn CaptureSource>>,
    latest: RwLock<Option<Arc<DynamicImage>>>,
}

impl FrameService {
    pub fn new(monitored_room: &str, capture: Option<Arc<dyn CaptureSource>>) -> Self {
        Self {
            monitored_room: monitored_room.to_string(),
            capture,
            latest: RwLock::new(None),
        }
    }

    pub fn is_monitored(&self, code: &str) -> bool {
        self.monitored_room.eq_ignore_ascii_case(code.trim())
    }

    pub async fn store(&self, frame: Arc<DynamicImage>) {
        *self.latest.write().await = Some(frame);
    }

    /// Returns the retained frame, or tries one fresh capture when the
    /// scanner has not produced any frame yet.
    pub async fn latest_frame(&self, code: &str) -> Result<Arc<DynamicImage>, RoomError> {
        if !self.is_monitored(code) {
            return Err(RoomError::ImageUnavailable);
        }

        if let Some(frame) = self.latest.read().await.clone() {
            return Ok(frame);
        }

        let capture = self.capture.as_ref().ok_or(RoomError::ImageUnavailable)?;

        match capture.acquire_frame().await {
            Ok(frame) => Ok(Arc::new(frame)),
            Err(e) => {
                tracing::warn!("fresh capture for snapshot of {} failed: {}", code, e);
                Err(RoomError::ImageUnavailable)
            }
        }
    }
}

pub fn encode_jpeg(frame: &DynamicImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(&frame.to_rgb8())?;

    Ok(buffer)
}
