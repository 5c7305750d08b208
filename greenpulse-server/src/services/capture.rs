use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use reqwest::Client;

use crate::configs::Camera;
use crate::errors::CaptureError;

/// A device that can hand over the current view of a room.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn acquire_frame(&self) -> Result<DynamicImage, CaptureError>;
}

/// Camera exposing still images over HTTP, as most IP cameras do.
pub struct HttpCamera {
    client: Client,
    url: String,
}

impl HttpCamera {
    pub fn new(camera: &Camera) -> Result<Self, CaptureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(camera.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: camera.url.clone(),
        })
    }
}

#[async_trait]
impl CaptureSource for HttpCamera {
    async fn acquire_frame(&self) -> Result<DynamicImage, CaptureError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(CaptureError::BadStatus(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;

        Ok(image::load_from_memory(&bytes)?)
    }
}
