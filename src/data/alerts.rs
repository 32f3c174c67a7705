//! Pending alerts.

use std::time::Instant;

use fraudwatch_types::{Alert, Severity};

/// Alerts as last fetched, with local escalation/assignment updates.
#[derive(Debug, Clone, Default)]
pub struct AlertBook {
    items: Vec<Alert>,
    pub last_updated: Option<Instant>,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with a fresh fetch, most severe first.
    pub fn replace(&mut self, mut items: Vec<Alert>, now: Instant) {
        items.sort_by(|a, b| b.severity.cmp(&a.severity));
        self.items = items;
        self.last_updated = Some(now);
    }

    pub fn all(&self) -> &[Alert] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn mark_escalated(&mut self, id: &str) -> bool {
        self.update(id, |alert| {
            alert.escalated = true;
            alert.status = "Escalated".to_string();
        })
    }

    pub fn assign(&mut self, id: &str, user: &str) -> bool {
        self.update(id, |alert| alert.assigned_to = Some(user.to_string()))
    }

    /// Drop the alert raised for a transaction once it has been resolved.
    pub fn resolve(&mut self, transaction_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.transaction_id != transaction_id);
        self.items.len() != before
    }

    /// Count of alerts at or above a severity.
    pub fn at_least(&self, severity: Severity) -> usize {
        self.items.iter().filter(|a| a.severity >= severity).count()
    }

    fn update(&mut self, id: &str, f: impl FnOnce(&mut Alert)) -> bool {
        match self.items.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                f(alert);
                true
            }
            None => false,
        }
    }
}
