//! Error types for backend calls.

use thiserror::Error;

/// Which of the three failure families an error belongs to.
///
/// The console treats all three the same way (notify, log, keep the old
/// state) but logs and tests care about the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a usable HTTP response.
    Transport,
    /// The backend answered and said no (`success: false`).
    Application,
    /// The backend answered with something we could not decode.
    Malformed,
}

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection or protocol failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success HTTP status.
    #[error("Backend returned status {status}")]
    Status { status: u16, body: String },

    /// The backend processed the request and reported failure.
    #[error("{message}")]
    Rejected { message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Malformed(String),

    /// A configured or returned URL is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Saving a download to disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BackendError::Transport(_)
            | BackendError::Timeout
            | BackendError::Status { .. }
            | BackendError::InvalidUrl(_)
            | BackendError::Io(_) => ErrorKind::Transport,
            BackendError::Rejected { .. } => ErrorKind::Application,
            BackendError::Malformed(_) => ErrorKind::Malformed,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_decode() {
            BackendError::Malformed(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for BackendError {
    fn from(err: url::ParseError) -> Self {
        BackendError::InvalidUrl(err.to_string())
    }
}
