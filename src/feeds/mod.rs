//! Live dashboard feeds.
//!
//! Feeds run on the tokio runtime and hand their results to the UI thread
//! through a channel. Each result carries the stream epoch it was fetched
//! under, so the UI can drop anything that arrives after a pause.

mod dashboard;

pub use dashboard::{mount, SharedFilter, ALERTS_FEED, STATS_FEED, TRANSACTIONS_FEED};

use fraudwatch_types::{Alert, DashboardStats, Transaction};
use tokio::sync::mpsc;

/// What a feed fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedPayload {
    Transactions(Vec<Transaction>),
    Stats(DashboardStats),
    Alerts(Vec<Alert>),
}

/// A feed result tagged with the epoch of the tick that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedUpdate {
    pub epoch: u64,
    pub payload: FeedPayload,
}

/// Sending half, cloned into every feed.
#[derive(Debug, Clone)]
pub struct FeedSender {
    tx: mpsc::UnboundedSender<FeedUpdate>,
}

impl FeedSender {
    /// Deliver a result. Returns `false` once the inbox is gone.
    pub fn send(&self, epoch: u64, payload: FeedPayload) -> bool {
        self.tx.send(FeedUpdate { epoch, payload }).is_ok()
    }
}

/// Receiving half, drained by the UI loop without blocking.
///
/// # Example
///
/// ```
/// use fraudwatch::feeds::{FeedInbox, FeedPayload};
///
/// let (tx, mut inbox) = FeedInbox::create();
/// tx.send(3, FeedPayload::Alerts(Vec::new()));
///
/// let update = inbox.try_next().unwrap();
/// assert_eq!(update.epoch, 3);
/// assert!(inbox.try_next().is_none());
/// ```
#[derive(Debug)]
pub struct FeedInbox {
    rx: mpsc::UnboundedReceiver<FeedUpdate>,
}

impl FeedInbox {
    /// Create a sender/inbox pair.
    pub fn create() -> (FeedSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (FeedSender { tx }, Self { rx })
    }

    /// Next pending update, if any.
    pub fn try_next(&mut self) -> Option<FeedUpdate> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbox_preserves_order() {
        let (tx, mut inbox) = FeedInbox::create();
        assert!(tx.send(1, FeedPayload::Stats(DashboardStats::default())));
        assert!(tx.send(2, FeedPayload::Transactions(Vec::new())));

        assert_eq!(inbox.try_next().unwrap().epoch, 1);
        assert_eq!(inbox.try_next().unwrap().epoch, 2);
        assert!(inbox.try_next().is_none());
    }

    #[test]
    fn send_after_inbox_dropped() {
        let (tx, inbox) = FeedInbox::create();
        drop(inbox);
        assert!(!tx.send(1, FeedPayload::Alerts(Vec::new())));
    }
}
