use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::models::detection::Detection;
use crate::models::room::{RoomUpdate, Source, StatusChange};
use crate::services::capture::CaptureSource;
use crate::services::detection::DetectionChain;
use crate::services::occupancy_service::OccupancyService;

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Updated {
        detection: Detection,
        source: Source,
        change: StatusChange,
    },
    CaptureFailed,
    Undetected,
    Rejected,
}

/// Polls one monitored room: capture, detect, update, alert.
///
/// Cycles run strictly one after another so the status read before an update
/// is always the one written by the previous cycle.
pub struct Scanner {
    room_code: String,
    interval: Duration,
    occupancy: Arc<OccupancyService>,
    capture: Option<Arc<dyn CaptureSource>>,
    chain: DetectionChain,
}

impl Scanner {
    pub fn new(
        room_code: &str,
        interval: Duration,
        occupancy: Arc<OccupancyService>,
        capture: Option<Arc<dyn CaptureSource>>,
        chain: DetectionChain,
    ) -> Self {
        Self {
            room_code: room_code.to_string(),
            interval,
            occupancy,
            capture,
            chain,
        }
    }

    /// Runs until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// Shutdown is observed between cycles. A cycle in flight runs to the end,
    /// so a stored transition always has its alert; the camera and vision
    /// timeouts bound how long that takes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("starting scanner for room {}", self.room_code);

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let stopped = *shutdown.borrow();
            if stopped {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => break,
            }

            let outcome = self.scan_once().await;

            tracing::trace!("cycle for {} finished: {:?}", self.room_code, outcome);
        }

        tracing::info!("scanner for room {} stopped", self.room_code);
    }

    pub async fn scan_once(&mut self) -> CycleOutcome {
        let frame = if self.chain.needs_frame() {
            let Some(capture) = &self.capture else {
                tracing::warn!("no capture source for room {}", self.room_code);
                return CycleOutcome::CaptureFailed;
            };

            match capture.acquire_frame().await {
                Ok(frame) => {
                    let frame = Arc::new(frame);
                    self.occupancy.frames().store(frame.clone()).await;
                    Some(frame)
                }
                Err(e) => {
                    tracing::warn!("failed to read frame for {}, retrying: {}", self.room_code, e);
                    return CycleOutcome::CaptureFailed;
                }
            }
        } else {
            None
        };

        let Some((detection, source)) = self.chain.detect(frame.as_deref()).await else {
            tracing::warn!("no backend produced a detection for {}", self.room_code);
            return CycleOutcome::Undetected;
        };

        tracing::debug!(
            "room {} -> {} people detected (confidence: {}, source: {:?})",
            self.room_code,
            detection.count,
            detection.confidence,
            source
        );

        let update = RoomUpdate::detection(detection.count, detection.confidence, source);

        match self.occupancy.apply(&self.room_code, update).await {
            Ok(change) => CycleOutcome::Updated {
                detection,
                source,
                change,
            },
            Err(e) => {
                tracing::error!("failed to update room {}: {}", self.room_code, e);
                CycleOutcome::Rejected
            }
        }
    }
}
