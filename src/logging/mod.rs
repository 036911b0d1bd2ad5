//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::{LOG_ENV_VAR, init_subscriber};
pub use types::{EntryRecord, EntryStatus, Log};
pub use utils::log_file_path;
