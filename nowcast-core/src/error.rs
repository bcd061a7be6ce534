//! Failure taxonomy for a single fetch.

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can end a fetch without a reading.
///
/// None of these are retried; the caller decides whether to fetch again.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid request URL: {0}")]
    InvalidRequest(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    NetworkError,
    DecodeError,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Network(_) | Self::Status { .. } => ErrorKind::NetworkError,
            Self::Decode(_) => ErrorKind::DecodeError,
        }
    }

    /// Generic text for the error view. Subtypes are not distinguished.
    pub fn user_message(&self) -> &'static str {
        "Unable to load the current weather."
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::InvalidRequest => "invalid request",
            ErrorKind::NetworkError => "network error",
            ErrorKind::DecodeError => "decode error",
        })
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
