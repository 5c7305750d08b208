pub mod alert;
pub mod detection;
pub mod room;
pub mod summary;

pub use alert::{AlertEvent, AlertKind};
pub use detection::{Detection, DetectionOutcome};
pub use room::{RoomConfig, RoomRecord, RoomState, RoomStatus, RoomUpdate, Source, StatusChange};
pub use summary::Summary;
