use serde::Serialize;
use thiserror::Error;

/// Per-request transport failure.
///
/// Only the kind is kept: a network failure is a recorded outcome of one
/// iteration, never a reason to stop a virtual user or the run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed")]
    Connect,
    #[error("failed to read response body")]
    Body,
    #[error("request failed")]
    Request,
}

impl NetworkError {
    #[must_use]
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_connect() {
            NetworkError::Connect
        } else if err.is_body() || err.is_decode() {
            NetworkError::Body
        } else {
            NetworkError::Request
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NetworkError::Timeout => "timeout",
            NetworkError::Connect => "connect",
            NetworkError::Body => "body",
            NetworkError::Request => "request",
        }
    }
}
