//! Fraud alerts and audit log entries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::transaction::lenient_score;

/// Alert severity as reported by the backend.
///
/// Unrecognised values decode as `Unknown`, which ranks below `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    fn rank(self) -> u8 {
        match self {
            Severity::Unknown => 0,
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Unknown => "-",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A pending fraud alert.
///
/// Alerts are keyed by their storage id (`_id`) for escalation and
/// assignment, and by `transaction_id` for resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(alias = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub escalated: bool,
    #[serde(default, deserialize_with = "lenient_score")]
    pub risk_score: f64,
}

impl Alert {
    pub fn new(id: impl Into<String>, transaction_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transaction_id: transaction_id.into(),
            customer: String::new(),
            severity: Severity::Unknown,
            status: String::from("Pending"),
            reason: None,
            assigned_to: None,
            escalated: false,
            risk_score: 0.0,
        }
    }
}

/// One row of the backend's audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mongo_style_id() {
        let json = r#"{"_id": "6601", "transaction_id": "TXN-7", "severity": "High", "status": "Pending"}"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.id, "6601");
        assert_eq!(alert.transaction_id, "TXN-7");
        assert_eq!(alert.severity, Severity::High);
        assert!(!alert.escalated);
    }

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low > Severity::Unknown);
    }

    #[test]
    fn unknown_severity_is_tolerated() {
        let alert: Alert = serde_json::from_str(r#"{"severity": "Sev1"}"#).unwrap();
        assert_eq!(alert.severity, Severity::Unknown);
    }

    #[test]
    fn unrecognised_severity_sorts_below_low() {
        let mut severities: Vec<Severity> =
            serde_json::from_str(r#"["High", "Sev1", "Low", "Critical"]"#).unwrap();
        severities.sort();
        assert_eq!(
            severities,
            vec![Severity::Unknown, Severity::Low, Severity::High, Severity::Critical]
        );
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), r#""Medium""#);
        assert_eq!(Severity::default(), Severity::Unknown);
    }
}
