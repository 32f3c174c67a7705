//! The StreamController: one pause/resume switch for many feeds.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::StreamError;
use crate::event::StreamEvent;
use crate::feed::{feed_fn, Feed, Tick};

/// Capacity of the event broadcast channel.
const EVENT_CAPACITY: usize = 64;

/// Lifecycle state of a [`StreamController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Created, never started.
    Idle,
    /// Every registered feed has one armed timer.
    Running,
    /// No timers armed; registrations kept.
    Paused,
    /// Terminal. No timers, no registrations.
    Disposed,
}

impl StreamState {
    pub fn label(&self) -> &'static str {
        match self {
            StreamState::Idle => "Idle",
            StreamState::Running => "Live",
            StreamState::Paused => "Paused",
            StreamState::Disposed => "Stopped",
        }
    }
}

/// A registered feed definition.
struct FeedEntry {
    feed: Arc<dyn Feed>,
    interval: Duration,
    ticks: Arc<AtomicU64>,
}

/// Owns the paused/running state of a set of periodic feeds.
///
/// The controller is driven from a single owner (the UI loop) through
/// `&mut self`; the feeds themselves run on the tokio runtime passed to
/// [`StreamController::new`].
///
/// While running, exactly one timer task exists per registered feed. While
/// idle, paused or disposed, none do. Dropping the controller cancels every
/// timer.
pub struct StreamController {
    runtime: Handle,
    state: StreamState,
    feeds: BTreeMap<String, FeedEntry>,
    timers: BTreeMap<String, JoinHandle<()>>,
    epoch: u64,
    events: broadcast::Sender<StreamEvent>,
}

impl std::fmt::Debug for StreamController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamController")
            .field("state", &self.state)
            .field("feeds", &self.feeds.keys().collect::<Vec<_>>())
            .field("active_timers", &self.timers.len())
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl StreamController {
    /// Create an idle controller whose feeds will run on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            runtime,
            state: StreamState::Idle,
            feeds: BTreeMap::new(),
            timers: BTreeMap::new(),
            epoch: 0,
            events,
        }
    }

    /// Register a feed that fires every `interval`.
    ///
    /// Registering an existing name replaces the previous definition. If the
    /// controller is running, the feed is armed immediately so the one timer
    /// per feed invariant holds.
    pub fn register_feed<F: Feed>(
        &mut self,
        name: &str,
        feed: F,
        interval: Duration,
    ) -> Result<(), StreamError> {
        self.ensure_live()?;
        if name.trim().is_empty() {
            return Err(StreamError::EmptyName);
        }
        if interval.is_zero() {
            return Err(StreamError::InvalidInterval(name.to_string()));
        }

        if let Some(timer) = self.timers.remove(name) {
            timer.abort();
        }
        self.feeds.insert(
            name.to_string(),
            FeedEntry {
                feed: Arc::new(feed),
                interval,
                ticks: Arc::new(AtomicU64::new(0)),
            },
        );
        tracing::debug!(feed = name, interval_ms = interval.as_millis() as u64, "feed registered");

        if self.state == StreamState::Running {
            self.arm(name);
        }
        Ok(())
    }

    /// Register an async closure as a feed.
    pub fn register_fn<F, Fut>(
        &mut self,
        name: &str,
        interval: Duration,
        f: F,
    ) -> Result<(), StreamError>
    where
        F: Fn(Tick) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_feed(name, feed_fn(f), interval)
    }

    /// Remove a feed and cancel its timer.
    ///
    /// Returns `true` if the feed existed.
    pub fn unregister_feed(&mut self, name: &str) -> bool {
        if let Some(timer) = self.timers.remove(name) {
            timer.abort();
        }
        self.feeds.remove(name).is_some()
    }

    /// Arm every registered feed. A no-op while already running.
    pub fn start(&mut self) -> Result<StreamState, StreamError> {
        self.ensure_live()?;
        if self.state == StreamState::Running {
            return Ok(self.state);
        }

        let resumed = self.state == StreamState::Paused;
        self.epoch += 1;
        self.state = StreamState::Running;

        let names: Vec<String> = self.feeds.keys().cloned().collect();
        for name in &names {
            self.arm(name);
        }

        tracing::info!(epoch = self.epoch, feeds = names.len(), resumed, "stream started");
        let _ = self.events.send(StreamEvent::Started {
            epoch: self.epoch,
            resumed,
        });
        Ok(self.state)
    }

    /// Re-arm the feeds after a pause. Same as [`start`](Self::start).
    pub fn resume(&mut self) -> Result<StreamState, StreamError> {
        self.start()
    }

    /// Cancel every timer and keep the registrations.
    ///
    /// Idempotent. A controller that never started stays idle, and a
    /// disposed controller stays disposed.
    pub fn pause(&mut self) -> StreamState {
        if self.state != StreamState::Running {
            return self.state;
        }

        self.cancel_timers();
        self.epoch += 1;
        self.state = StreamState::Paused;

        tracing::info!(epoch = self.epoch, "stream paused");
        let _ = self.events.send(StreamEvent::Paused { epoch: self.epoch });
        self.state
    }

    /// Pause if running, otherwise start. Returns the resulting state.
    pub fn toggle(&mut self) -> Result<StreamState, StreamError> {
        match self.state {
            StreamState::Running => Ok(self.pause()),
            _ => self.start(),
        }
    }

    /// Cancel every timer and forget every feed. Terminal.
    pub fn dispose(&mut self) {
        if self.state == StreamState::Disposed {
            return;
        }

        self.cancel_timers();
        self.feeds.clear();
        self.epoch += 1;
        self.state = StreamState::Disposed;

        tracing::info!("stream disposed");
        let _ = self.events.send(StreamEvent::Disposed);
    }

    /// Invoke one feed right away, outside its schedule.
    ///
    /// Only dispatches while running, since the result would be stale
    /// otherwise. Returns whether an invocation was dispatched.
    pub fn poll_now(&self, name: &str) -> Result<bool, StreamError> {
        self.ensure_live()?;
        let entry = self
            .feeds
            .get(name)
            .ok_or_else(|| StreamError::UnknownFeed(name.to_string()))?;
        if self.state != StreamState::Running {
            return Ok(false);
        }

        let feed_name: Arc<str> = Arc::from(name);
        dispatch(
            &self.runtime,
            entry.feed.clone(),
            feed_name,
            self.epoch,
            &entry.ticks,
            &self.events,
        );
        Ok(true)
    }

    /// Invoke every feed right away. Returns how many were dispatched.
    pub fn poll_all(&self) -> Result<usize, StreamError> {
        let mut dispatched = 0;
        for name in self.feeds.keys() {
            if self.poll_now(name)? {
                dispatched += 1;
            }
        }
        Ok(dispatched)
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StreamState::Running
    }

    /// Identifier of the current run.
    ///
    /// Bumped on every start, pause and dispose. A result whose
    /// [`Tick::epoch`] differs from this, or that arrives while not running,
    /// is stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a result produced under `epoch` may still be applied.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.is_running() && epoch == self.epoch
    }

    /// Number of armed timers.
    pub fn active_timers(&self) -> usize {
        self.timers.values().filter(|t| !t.is_finished()).count()
    }

    /// Registered feed names, in order.
    pub fn feed_names(&self) -> Vec<&str> {
        self.feeds.keys().map(String::as_str).collect()
    }

    /// Number of invocations of a feed so far.
    pub fn ticks(&self, name: &str) -> Option<u64> {
        self.feeds
            .get(name)
            .map(|entry| entry.ticks.load(Ordering::Relaxed))
    }

    /// Interval a feed was registered with.
    pub fn interval(&self, name: &str) -> Option<Duration> {
        self.feeds.get(name).map(|entry| entry.interval)
    }

    /// Subscribe to lifecycle and failure events.
    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.events.subscribe()
    }

    fn ensure_live(&self) -> Result<(), StreamError> {
        if self.state == StreamState::Disposed {
            Err(StreamError::Disposed)
        } else {
            Ok(())
        }
    }

    fn cancel_timers(&mut self) {
        for (_, timer) in std::mem::take(&mut self.timers) {
            timer.abort();
        }
    }

    /// Spawn the timer task for one feed.
    fn arm(&mut self, name: &str) {
        let Some(entry) = self.feeds.get(name) else {
            return;
        };

        let feed = entry.feed.clone();
        let ticks = entry.ticks.clone();
        let interval = entry.interval;
        let events = self.events.clone();
        let epoch = self.epoch;
        let feed_name: Arc<str> = Arc::from(name);
        let runtime = self.runtime.clone();

        let timer = self.runtime.spawn(async move {
            // First tick one interval after arming, not immediately.
            let mut timer = tokio::time::interval_at(Instant::now() + interval, interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                timer.tick().await;
                dispatch(&runtime, feed.clone(), feed_name.clone(), epoch, &ticks, &events);
            }
        });

        if let Some(previous) = self.timers.insert(name.to_string(), timer) {
            previous.abort();
        }
    }
}

impl Drop for StreamController {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

/// Run one invocation of a feed as its own task.
///
/// The invocation is detached from the timer so a slow, failing or
/// panicking fetch never delays or kills the schedule.
fn dispatch(
    runtime: &Handle,
    feed: Arc<dyn Feed>,
    name: Arc<str>,
    epoch: u64,
    ticks: &AtomicU64,
    events: &broadcast::Sender<StreamEvent>,
) {
    let seq = ticks.fetch_add(1, Ordering::Relaxed) + 1;
    let events = events.clone();
    let tick = Tick {
        feed: name.clone(),
        epoch,
        seq,
    };

    runtime.spawn(async move {
        if let Err(err) = feed.fetch(tick).await {
            tracing::warn!(feed = %name, seq, error = %format!("{err:#}"), "feed tick failed");
            let _ = events.send(StreamEvent::FeedFailed {
                feed: name.to_string(),
                epoch,
                seq,
                error: format!("{err:#}"),
            });
        }
    });
}
