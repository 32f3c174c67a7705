//! Toast notifications.
//!
//! Notifications are shown for a limited time and kept in a bounded
//! history for the Activity view. Every notification is also logged.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of notifications kept for the Activity view.
const MAX_HISTORY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

impl Level {
    pub fn symbol(&self) -> &'static str {
        match self {
            Level::Success => "✓",
            Level::Error => "✗",
            Level::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub title: String,
    pub message: String,
    pub created: Instant,
    pub ttl: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= self.ttl
    }

    fn same_content(&self, level: Level, title: &str, message: &str) -> bool {
        self.level == level && self.title == title && self.message == message
    }
}

/// On-screen notifications plus their history.
#[derive(Debug)]
pub struct Notifications {
    active: Vec<Notification>,
    history: VecDeque<Notification>,
    next_id: u64,
    default_ttl: Duration,
    max_visible: usize,
}

impl Notifications {
    pub fn new(default_ttl: Duration, max_visible: usize) -> Self {
        Self {
            active: Vec::new(),
            history: VecDeque::new(),
            next_id: 1,
            default_ttl,
            max_visible: max_visible.max(1),
        }
    }

    /// Show a notification and return its id.
    ///
    /// If an identical notification is still on screen it is refreshed
    /// instead of stacking a duplicate, so a feed failing every tick
    /// produces one toast.
    pub fn push(
        &mut self,
        level: Level,
        title: impl Into<String>,
        message: impl Into<String>,
        ttl: Duration,
        now: Instant,
    ) -> u64 {
        let title = title.into();
        let message = message.into();

        match level {
            Level::Error => tracing::warn!(title = %title, "{}", message),
            _ => tracing::info!(title = %title, "{}", message),
        }

        if let Some(existing) = self
            .active
            .iter_mut()
            .find(|n| !n.is_expired(now) && n.same_content(level, &title, &message))
        {
            existing.created = now;
            existing.ttl = ttl;
            return existing.id;
        }

        let notification = Notification {
            id: self.next_id,
            level,
            title,
            message,
            created: now,
            ttl,
        };
        self.next_id += 1;

        self.history.push_back(notification.clone());
        if self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
        let id = notification.id;
        self.active.push(notification);
        id
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.push(Level::Success, title, message, self.default_ttl, Instant::now())
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.push(Level::Error, title, message, self.default_ttl, Instant::now())
    }

    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.push(Level::Info, title, message, self.default_ttl, Instant::now())
    }

    /// Remove a notification from the screen. It stays in the history.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    /// Dismiss the newest notification on screen.
    pub fn dismiss_latest(&mut self) -> bool {
        match self.active.iter().map(|n| n.id).max() {
            Some(id) => self.dismiss(id),
            None => false,
        }
    }

    /// Drop expired notifications. Returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active.retain(|n| !n.is_expired(now));
        before - self.active.len()
    }

    /// Notifications to draw, newest first.
    pub fn visible(&self, now: Instant) -> Vec<&Notification> {
        let mut visible: Vec<&Notification> =
            self.active.iter().filter(|n| !n.is_expired(now)).collect();
        visible.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        visible.truncate(self.max_visible);
        visible
    }

    /// Everything ever shown, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &Notification> + ExactSizeIterator {
        self.history.iter()
    }
}
