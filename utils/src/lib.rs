//! Shared utilities for the Agora workspace.

pub mod lock;
pub mod logging;
pub mod time;

pub use lock::{lock_or_recover, read_or_recover, write_or_recover};
pub use logging::{init_logging, LogFormat};
pub use time::format_duration;
