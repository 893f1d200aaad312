mod args;
mod error;
mod logger;

pub use args::{CliArgs, Command, ExportArgs, WatchTarget};
pub use error::DashError;
pub use logger::setup_logging;
