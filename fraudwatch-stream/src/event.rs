//! Lifecycle and failure events published by the controller.

/// Something the UI may want to tell the user about.
///
/// Events are broadcast; a subscriber that falls behind loses the oldest
/// ones, which is acceptable for notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Timers were armed. `resumed` is true when coming back from a pause.
    Started { epoch: u64, resumed: bool },
    /// Timers were cancelled by a pause.
    Paused { epoch: u64 },
    /// The controller was disposed.
    Disposed,
    /// One invocation of a feed failed. The schedule is unaffected.
    ///
    /// `epoch` is the epoch of the failed tick; compare it with
    /// `StreamController::is_current` before surfacing it.
    FeedFailed {
        feed: String,
        epoch: u64,
        seq: u64,
        error: String,
    },
}
