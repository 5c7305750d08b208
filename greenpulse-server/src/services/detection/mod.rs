mod local;
mod remote;
mod simulate;

pub use local::{EMPTY_CONFIDENCE, FaceRegionDetector, HIT_CONFIDENCE, HaarFaceDetector, LocalDetector};
pub use remote::VisionClient;
pub use simulate::Simulator;

use image::DynamicImage;

use crate::models::detection::{Detection, DetectionOutcome};
use crate::models::room::Source;

pub enum DetectionBackend {
    RemoteInference(VisionClient),
    LocalFallback(LocalDetector),
    Simulated(Simulator),
}

impl DetectionBackend {
    pub fn source(&self) -> Source {
        match self {
            DetectionBackend::RemoteInference(_) => Source::VisionAi,
            DetectionBackend::LocalFallback(_) => Source::LocalFallback,
            DetectionBackend::Simulated(_) => Source::DemoSimulated,
        }
    }

    pub fn needs_frame(&self) -> bool {
        !matches!(self, DetectionBackend::Simulated(_))
    }

    pub async fn detect(&mut self, frame: Option<&DynamicImage>) -> DetectionOutcome {
        match (self, frame) {
            (DetectionBackend::RemoteInference(client), Some(frame)) => client.detect(frame).await,
            (DetectionBackend::LocalFallback(local), Some(frame)) => local.detect(frame).await,
            (DetectionBackend::Simulated(simulator), _) => DetectionOutcome::Detected(simulator.detect()),
            (_, None) => DetectionOutcome::Unavailable,
        }
    }
}

/// Ordered list of backends; the first one that produces a detection wins.
pub struct DetectionChain {
    backends: Vec<DetectionBackend>,
}

impl DetectionChain {
    pub fn new(backends: Vec<DetectionBackend>) -> Self {
        Self { backends }
    }

    /// Remote inference when configured, then the local detector.
    pub fn live(remote: Option<VisionClient>, local: LocalDetector) -> Self {
        let mut backends = Vec::with_capacity(2);
        if let Some(remote) = remote {
            backends.push(DetectionBackend::RemoteInference(remote));
        }
        backends.push(DetectionBackend::LocalFallback(local));

        Self::new(backends)
    }

    pub fn simulated(simulator: Simulator) -> Self {
        Self::new(vec![DetectionBackend::Simulated(simulator)])
    }

    pub fn needs_frame(&self) -> bool {
        self.backends.iter().any(DetectionBackend::needs_frame)
    }

    pub async fn detect(&mut self, frame: Option<&DynamicImage>) -> Option<(Detection, Source)> {
        for backend in self.backends.iter_mut() {
            match backend.detect(frame).await {
                DetectionOutcome::Detected(detection) => return Some((detection, backend.source())),
                DetectionOutcome::Unavailable => {
                    tracing::info!("{:?} backend unavailable, trying next", backend.source());
                }
            }
        }

        None
    }
}
