mod alert_handle;
mod room_handle;
mod snapshot_handle;

pub use alert_handle::*;
pub use room_handle::*;
pub use snapshot_handle::*;
