mod clock;
mod log_dir;
pub mod tracing;

pub use clock::{FakeClock, ts};
pub use log_dir::LogDir;
pub use self::tracing::{CapturedEvent, capture_events};
