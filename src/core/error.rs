use thiserror::Error;

use crate::client::FetchError;

#[derive(Debug, Error, PartialEq)]
pub enum DashError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Fetch failed: {0}")]
    FetchError(#[from] FetchError),
    #[error("Action declined: {0}")]
    Declined(String),
    #[error("Resource handle '{0}' is stopped")]
    Stopped(String),
}

impl From<std::io::Error> for DashError {
    fn from(err: std::io::Error) -> Self {
        DashError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        DashError::InvalidRequest(err.to_string())
    }
}
