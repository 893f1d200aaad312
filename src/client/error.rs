use std::fmt;

use thiserror::Error;

/// Failure taxonomy surfaced to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// No response received.
    Network,
    /// Client, auth or tenant error.
    Http4xx,
    /// Server error.
    Http5xx,
    /// Body was not the JSON we expected.
    Decode,
}

impl FetchErrorKind {
    pub fn from_status(status: u16) -> Self {
        if status >= 500 {
            FetchErrorKind::Http5xx
        } else {
            FetchErrorKind::Http4xx
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchErrorKind::Network => "network",
            FetchErrorKind::Http4xx => "http_4xx",
            FetchErrorKind::Http5xx => "http_5xx",
            FetchErrorKind::Decode => "decode",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            status: None,
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::from_status(status),
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Decode,
            status: None,
            message: message.into(),
        }
    }

    /// Worth retrying on the next tick without user action.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Network | FetchErrorKind::Http5xx)
    }

    pub fn user_message(&self) -> String {
        match self.kind {
            FetchErrorKind::Network => "Could not reach the server. Check your connection.".into(),
            FetchErrorKind::Http4xx => self.message.clone(),
            FetchErrorKind::Http5xx => {
                "The server had a problem. Please try again shortly.".into()
            }
            FetchErrorKind::Decode => "Something went wrong while loading data.".into(),
        }
    }
}
