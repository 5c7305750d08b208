use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::rect::Rect;

use greenpulse_server::app::create_app;
use greenpulse_server::configs::{
    LocalDetector as LocalDetectorSettings, Logger, Scanner as ScannerSettings, Server, Settings,
    Vision,
};
use greenpulse_server::errors::CaptureError;
use greenpulse_server::models::room::RoomConfig;
use greenpulse_server::services::detection::{FaceRegionDetector, LocalDetector, VisionClient};
use greenpulse_server::services::{
    AlertService, CaptureSource, DetectionChain, FrameService, OccupancyService, RoomStore, Scanner,
};

pub const MONITORED_ROOM: &str = "B2";

pub struct MockApp {
    pub occupancy: Arc<OccupancyService>,
    pub router: Router,
    pub camera: Option<Arc<dyn CaptureSource>>,
}

impl MockApp {
    pub fn new() -> Self {
        Self::with_camera(None)
    }

    pub fn with_camera(camera: Option<Arc<dyn CaptureSource>>) -> Self {
        let frames = Arc::new(FrameService::new(MONITORED_ROOM, camera.clone()));
        let occupancy = Arc::new(OccupancyService::new(
            Arc::new(RoomStore::new(catalogue(), MONITORED_ROOM)),
            Arc::new(AlertService::new()),
            frames,
        ));

        Self {
            router: create_app(occupancy.clone()),
            occupancy,
            camera,
        }
    }

    pub fn scanner(&self, chain: DetectionChain) -> Scanner {
        Scanner::new(
            MONITORED_ROOM,
            Duration::from_millis(20),
            self.occupancy.clone(),
            self.camera.clone(),
            chain,
        )
    }
}

pub fn catalogue() -> Vec<RoomConfig> {
    let room = |code: &str, name: &str, occupancy, capacity, lights, ac, energy, confidence| RoomConfig {
        code: code.to_string(),
        name: name.to_string(),
        capacity,
        energy,
        lights,
        ac,
        occupancy,
        confidence,
    };

    vec![
        room("A1", "Conference Room A", 8, 12, true, true, 18, 0.95),
        room("A2", "Open Office A", 24, 40, true, true, 32, 0.92),
        room("B1", "Server Room", 0, 4, false, false, 45, 0.99),
        room("B2", "Break Room", 0, 20, true, true, 12, 0.0),
        room("C1", "Lab Space", 6, 15, true, true, 28, 0.88),
        room("C2", "Training Room", 0, 30, true, true, 22, 0.0),
    ]
}

/// Settings for a monitored B2 without a vision key, so live chains run
/// local detection only.
pub fn settings() -> Settings {
    Settings {
        server: Server {
            host: "127.0.0.1".into(),
            port: 0,
        },
        logger: Logger {
            level: "debug".into(),
        },
        scanner: ScannerSettings {
            monitored_room: MONITORED_ROOM.into(),
            interval_secs: 1,
            camera: None,
        },
        vision: Vision {
            endpoint: "http://127.0.0.1:9/v1/images:annotate".into(),
            api_key: None,
            timeout_secs: 1,
        },
        local_detector: LocalDetectorSettings::default(),
        rooms: catalogue(),
    }
}

pub fn test_frame() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, image::Rgb([90, 110, 130])))
}

/// Camera that replays a script of successes and failures, then keeps
/// delivering frames.
pub struct ScriptedCamera {
    script: Mutex<VecDeque<bool>>,
}

impl ScriptedCamera {
    pub fn new(script: &[bool]) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
        }
    }

    pub fn working() -> Self {
        Self::new(&[])
    }

    pub fn broken() -> Self {
        Self::new(&[false; 64])
    }
}

#[async_trait]
impl CaptureSource for ScriptedCamera {
    async fn acquire_frame(&self) -> Result<DynamicImage, CaptureError> {
        let ok = self.script.lock().unwrap().pop_front().unwrap_or(true);

        if ok {
            Ok(test_frame())
        } else {
            Err(CaptureError::BadStatus(503))
        }
    }
}

/// Camera that takes `delay` to deliver every frame.
pub struct SlowCamera {
    delay: Duration,
}

impl SlowCamera {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CaptureSource for SlowCamera {
    async fn acquire_frame(&self) -> Result<DynamicImage, CaptureError> {
        tokio::time::sleep(self.delay).await;

        Ok(test_frame())
    }
}

/// Face detector returning a scripted number of faces per call, then none.
pub struct ScriptedFaces {
    counts: Mutex<VecDeque<usize>>,
}

impl ScriptedFaces {
    pub fn new(counts: &[usize]) -> Self {
        Self {
            counts: Mutex::new(counts.iter().copied().collect()),
        }
    }
}

impl FaceRegionDetector for ScriptedFaces {
    fn detect(&self, _gray: &GrayImage) -> Vec<Rect> {
        let count = self.counts.lock().unwrap().pop_front().unwrap_or(0);

        (0..count)
            .map(|i| Rect::at(i as i32 * 10, 0).of_size(8, 8))
            .collect()
    }
}

pub fn local_detector(counts: &[usize]) -> LocalDetector {
    LocalDetector::new(Arc::new(ScriptedFaces::new(counts)))
}

pub fn vision_client(endpoint: &str) -> VisionClient {
    let vision = Vision {
        endpoint: endpoint.to_string(),
        api_key: Some("test-key".to_string()),
        timeout_secs: 2,
    };

    VisionClient::new(&vision, "test-key").unwrap()
}

/// A vision endpoint nothing listens on.
pub fn unreachable_vision() -> VisionClient {
    vision_client("http://127.0.0.1:9/v1/images:annotate")
}
