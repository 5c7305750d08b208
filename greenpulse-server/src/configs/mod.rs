pub mod settings;

pub use settings::{Camera, LocalDetector, Logger, Scanner, Server, Settings, Vision};
