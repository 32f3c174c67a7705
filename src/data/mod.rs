//! Data models for what the console displays.
//!
//! Feed payloads land here and are kept until the next fetch replaces them.
//! Actions taken from the console update the books in place so the change
//! shows up before the next poll confirms it.
//!
//! ## Submodules
//!
//! - [`alerts`]: pending alerts, most severe first ([`AlertBook`])
//! - [`duration`]: parsing and formatting of intervals (e.g., "2s", "500ms")
//! - [`history`]: stats history for sparklines and rates ([`StatsHistory`])
//! - [`risk`]: display classification of risk scores ([`RiskThresholds`])
//! - [`transactions`]: the live transaction list ([`TransactionBook`])

pub mod alerts;
pub mod duration;
pub mod history;
pub mod risk;
pub mod transactions;

pub use alerts::AlertBook;
pub use history::StatsHistory;
pub use risk::{RiskLevel, RiskThresholds};
pub use transactions::TransactionBook;
