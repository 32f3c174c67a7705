//! The unit of periodic work.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// Context handed to every feed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// Name the feed was registered under.
    pub feed: Arc<str>,
    /// Run this tick belongs to. Changes on every start, pause and dispose,
    /// so results carrying an old epoch can be recognised as stale.
    pub epoch: u64,
    /// Invocation number for this feed, starting at 1.
    pub seq: u64,
}

/// A named periodic fetch.
///
/// Invocations are not serialised: if a fetch is still running when the
/// next tick fires, both run. Implementations must tolerate that.
#[async_trait]
pub trait Feed: Send + Sync + 'static {
    async fn fetch(&self, tick: Tick) -> anyhow::Result<()>;
}

/// Adapter that turns an async closure into a [`Feed`].
pub struct FnFeed<F>(F);

impl<F> std::fmt::Debug for FnFeed<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnFeed")
    }
}

#[async_trait]
impl<F, Fut> Feed for FnFeed<F>
where
    F: Fn(Tick) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn fetch(&self, tick: Tick) -> anyhow::Result<()> {
        (self.0)(tick).await
    }
}

/// Wrap an async closure as a feed.
///
/// ```rust
/// use fraudwatch_stream::{feed_fn, Feed};
///
/// let feed = feed_fn(|tick| async move {
///     anyhow::ensure!(tick.seq > 0, "ticks start at 1");
///     Ok(())
/// });
/// # let _: &dyn Feed = &feed;
/// ```
pub fn feed_fn<F, Fut>(f: F) -> FnFeed<F>
where
    F: Fn(Tick) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    FnFeed(f)
}
