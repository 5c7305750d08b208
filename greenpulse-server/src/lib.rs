use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::app::create_app;
use crate::configs::Settings;
use crate::services::detection::{HaarFaceDetector, LocalDetector, Simulator, VisionClient};
use crate::services::{
    AlertService, CaptureSource, DetectionChain, FrameService, HttpCamera, OccupancyService,
    RoomStore, Scanner,
};

pub mod app;
pub mod configs;
pub mod errors;
pub mod handles;
pub mod models;
pub mod services;

pub async fn run(settings: &Arc<Settings>) -> anyhow::Result<()> {
    let (occupancy, scanner) = create_monitor(settings).await?;

    let (shutdown_sender, shutdown_receiver) = watch::channel(false);
    let scanner_task = tokio::spawn(scanner.run(shutdown_receiver));

    let app = create_app(occupancy);

    let ip_addr = settings.server.host.parse::<IpAddr>()?;

    let address = SocketAddr::from((ip_addr, settings.server.port));

    let listener = TcpListener::bind(&address).await?;

    tracing::info!("listening on {:?}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_sender))
        .await?;

    scanner_task.await?;

    Ok(())
}

/// Builds the room state and the scanner for the monitored room.
pub async fn create_monitor(settings: &Settings) -> anyhow::Result<(Arc<OccupancyService>, Scanner)> {
    let camera: Option<Arc<dyn CaptureSource>> = match &settings.scanner.camera {
        Some(camera) => Some(Arc::new(HttpCamera::new(camera)?)),
        None => None,
    };

    create_monitor_with_camera(settings, camera).await
}

/// Like [`create_monitor`], with an already built capture source.
///
/// A room with a camera always runs the live chain, even when the eager first
/// read fails; the scanner retries it every cycle. Only a room without a
/// camera is driven by simulated readings.
pub async fn create_monitor_with_camera(
    settings: &Settings,
    camera: Option<Arc<dyn CaptureSource>>,
) -> anyhow::Result<(Arc<OccupancyService>, Scanner)> {
    let room = settings.scanner.monitored_room.as_str();

    let frames = Arc::new(FrameService::new(room, camera.clone()));
    let occupancy = Arc::new(OccupancyService::new(
        Arc::new(RoomStore::new(settings.rooms.clone(), room)),
        Arc::new(AlertService::new()),
        frames.clone(),
    ));

    let chain = match &camera {
        Some(capture) => {
            match capture.acquire_frame().await {
                Ok(frame) => {
                    tracing::info!("camera connected for room {}", room);
                    frames.store(Arc::new(frame)).await;
                }
                Err(e) => {
                    tracing::warn!("camera for room {} not reachable yet ({}), retrying every cycle", room, e);
                }
            }

            live_chain(settings)?
        }
        None => {
            tracing::warn!("no camera configured for room {}, switching to demo mode", room);
            DetectionChain::simulated(Simulator::new())
        }
    };

    let scanner = Scanner::new(
        room,
        Duration::from_secs(settings.scanner.interval_secs),
        occupancy.clone(),
        camera,
        chain,
    );

    Ok((occupancy, scanner))
}

fn live_chain(settings: &Settings) -> anyhow::Result<DetectionChain> {
    let remote = match settings.vision.api_key.as_deref().filter(|key| !key.is_empty()) {
        Some(api_key) => Some(VisionClient::new(&settings.vision, api_key)?),
        None => {
            tracing::info!("no vision api key configured, using local detection only");
            None
        }
    };

    let local = LocalDetector::new(Arc::new(HaarFaceDetector::new(&settings.local_detector)));

    Ok(DetectionChain::live(remote, local))
}

async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("shutting down");

    let _ = shutdown.send(true);
}
