//! The live transaction list.

use std::time::Instant;

use fraudwatch_types::{Decision, StatusFilter, Transaction};

/// Latest transactions as last fetched, plus local decision updates.
#[derive(Debug, Clone, Default)]
pub struct TransactionBook {
    items: Vec<Transaction>,
    /// When the feed last delivered a list.
    pub last_updated: Option<Instant>,
}

impl TransactionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with a fresh fetch.
    pub fn replace(&mut self, items: Vec<Transaction>, now: Instant) {
        self.items = items;
        self.last_updated = Some(now);
    }

    pub fn all(&self) -> &[Transaction] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Record a decision made from this console.
    ///
    /// Returns `false` if the transaction is no longer in the list.
    pub fn apply_decision(&mut self, id: &str, decision: Decision) -> bool {
        match self.items.iter_mut().find(|t| t.id == id) {
            Some(txn) => {
                txn.decision = decision;
                true
            }
            None => false,
        }
    }

    /// Transactions passing the status filter and the search text.
    ///
    /// Search is case-insensitive over id, customer, location and channel.
    pub fn visible(&self, filter: StatusFilter, search: &str) -> Vec<&Transaction> {
        let search = search.to_lowercase();
        self.items
            .iter()
            .filter(|t| filter.matches(t.decision))
            .filter(|t| search.is_empty() || matches_search(t, &search))
            .collect()
    }

    /// Count of transactions with the given decision.
    pub fn count(&self, decision: Decision) -> usize {
        self.items.iter().filter(|t| t.decision == decision).count()
    }
}

fn matches_search(txn: &Transaction, needle: &str) -> bool {
    [&txn.id, &txn.customer, &txn.location, &txn.channel]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(id: &str, customer: &str, decision: Decision) -> Transaction {
        let mut t = Transaction::new(id, 100.0, 10.0);
        t.customer = customer.to_string();
        t.decision = decision;
        t
    }

    fn book() -> TransactionBook {
        let mut book = TransactionBook::new();
        book.replace(
            vec![
                txn("TXN-1", "Alice", Decision::Approved),
                txn("TXN-2", "Bob", Decision::Blocked),
                txn("TXN-3", "Alicia", Decision::Review),
            ],
            Instant::now(),
        );
        book
    }

    #[test]
    fn visible_applies_filter_and_search() {
        let book = book();
        assert_eq!(book.visible(StatusFilter::All, "").len(), 3);
        assert_eq!(book.visible(StatusFilter::Blocked, "").len(), 1);

        let alis: Vec<&str> = book
            .visible(StatusFilter::All, "ALI")
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(alis, ["TXN-1", "TXN-3"]);

        assert!(book.visible(StatusFilter::Review, "bob").is_empty());
    }

    #[test]
    fn apply_decision_updates_in_place() {
        let mut book = book();
        assert!(book.apply_decision("TXN-3", Decision::Blocked));
        assert_eq!(book.get("TXN-3").unwrap().decision, Decision::Blocked);
        assert_eq!(book.count(Decision::Blocked), 2);
        assert!(!book.apply_decision("TXN-404", Decision::Approved));
    }

    #[test]
    fn replace_overwrites_local_changes() {
        let mut book = book();
        book.apply_decision("TXN-1", Decision::Blocked);
        book.replace(vec![txn("TXN-1", "Alice", Decision::Approved)], Instant::now());
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("TXN-1").unwrap().decision, Decision::Approved);
    }
}
