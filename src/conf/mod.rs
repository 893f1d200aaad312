mod backend;
mod config;
mod export;
mod poll;

pub use backend::BackendConfig;
pub use config::Config;
pub use export::ExportConfig;
pub use poll::PollConfig;
