//! Error types for the stream controller.

use thiserror::Error;

/// Errors returned by [`StreamController`](crate::StreamController) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The controller was disposed and accepts no further work.
    #[error("stream controller has been disposed")]
    Disposed,

    /// A feed was registered with a zero interval.
    #[error("feed '{0}' must have an interval greater than zero")]
    InvalidInterval(String),

    /// A feed was registered without a name.
    #[error("feed name must not be empty")]
    EmptyName,

    /// No feed with this name is registered.
    #[error("no feed named '{0}' is registered")]
    UnknownFeed(String),
}
