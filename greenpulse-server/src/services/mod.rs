pub mod alert_service;
pub mod capture;
pub mod detection;
pub mod frame_service;
pub mod fusion;
pub mod occupancy_service;
pub mod room_store;
pub mod scanner;
pub mod status;

pub use alert_service::AlertService;
pub use capture::{CaptureSource, HttpCamera};
pub use detection::{DetectionBackend, DetectionChain};
pub use frame_service::FrameService;
pub use occupancy_service::OccupancyService;
pub use room_store::RoomStore;
pub use scanner::{CycleOutcome, Scanner};
