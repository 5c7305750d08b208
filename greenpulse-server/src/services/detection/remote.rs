use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use reqwest::Client;
use serde::Serialize;

use crate::configs::Vision;
use crate::errors::InferenceError;
use crate::models::detection::{Detection, DetectionOutcome};
use crate::services::frame_service::encode_jpeg;
use crate::services::fusion::{AnnotateImageResponse, AnnotateResponse, fuse};

const UPLOAD_JPEG_QUALITY: u8 = 90;

const FEATURES: [&str; 3] = ["OBJECT_LOCALIZATION", "LABEL_DETECTION", "FACE_DETECTION"];

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

/// Client for a Cloud Vision compatible `images:annotate` endpoint.
pub struct VisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl VisionClient {
    pub fn new(vision: &Vision, api_key: &str) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(vision.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: vision.endpoint.clone(),
            api_key: api_key.to_string(),
        })
    }

    /// Never fails: any problem with the call turns into `Unavailable`.
    pub async fn detect(&self, frame: &DynamicImage) -> DetectionOutcome {
        match self.annotate(frame).await {
            Ok(detection) => DetectionOutcome::Detected(detection),
            Err(e) => {
                tracing::warn!("vision inference unavailable: {}", e);
                DetectionOutcome::Unavailable
            }
        }
    }

    async fn annotate(&self, frame: &DynamicImage) -> Result<Detection, InferenceError> {
        let content = STANDARD.encode(encode_jpeg(frame, UPLOAD_JPEG_QUALITY)?);

        let request = AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: ImageContent { content },
                features: FEATURES.into_iter().map(|kind| Feature { kind }).collect(),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InferenceError::BadStatus(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let annotated: AnnotateResponse = serde_json::from_slice(&body)
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;

        let result = first_result(annotated)?;
        log_scene(&result);

        Ok(fuse(&result))
    }
}

fn first_result(annotated: AnnotateResponse) -> Result<AnnotateImageResponse, InferenceError> {
    let result = annotated
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| InferenceError::Malformed("no responses".into()))?;

    if let Some(error) = &result.error {
        return Err(InferenceError::Malformed(format!(
            "service error {}: {}",
            error.code, error.message
        )));
    }

    Ok(result)
}

fn log_scene(result: &AnnotateImageResponse) {
    for person in result.persons() {
        tracing::debug!("found a person (confidence: {:.0}%)", person.score * 100.0);
    }

    let equipment = result.localized_object_annotations.len() - result.persons().count();
    let labels: Vec<_> = result
        .label_annotations
        .iter()
        .take(5)
        .map(|label| label.description.as_str())
        .collect();

    tracing::debug!(
        faces = result.face_annotations.len(),
        equipment,
        "scene labels: {:?}",
        labels
    );
}
