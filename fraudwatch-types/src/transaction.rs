//! Transactions as scored by the backend.

use serde::{Deserialize, Deserializer, Serialize};

/// Decision the backend (or an analyst) attached to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Review,
    Blocked,
    Pending,
    /// Any value this console does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Decision {
    /// Label used in tables and notifications.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Review => "Review",
            Decision::Blocked => "Blocked",
            Decision::Pending => "Pending",
            Decision::Unknown => "-",
        }
    }
}

/// A single transaction row from the live feed.
///
/// The two backend services disagree on field names (`id` vs
/// `transaction_id`, `status` vs `decision`, `ai_reason` vs `reason`) and
/// sometimes send both, so decoding goes through [`RawTransaction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTransaction")]
pub struct Transaction {
    pub id: String,
    pub customer: String,
    pub amount: f64,
    pub location: String,
    pub channel: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub risk_score: f64,
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Deserialize)]
struct RawTransaction {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    transaction_id: Option<String>,
    #[serde(default)]
    customer: String,
    #[serde(default, deserialize_with = "lenient_score")]
    amount: f64,
    #[serde(default)]
    location: String,
    #[serde(default)]
    channel: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "lenient_score")]
    risk_score: f64,
    #[serde(default)]
    decision: Option<Decision>,
    #[serde(default)]
    status: Option<Decision>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    ai_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    timestamp: Option<String>,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        // An explicit decision wins over a workflow status like "Resolved".
        let decision = match (raw.decision, raw.status) {
            (Some(d), _) if d != Decision::Unknown => d,
            (_, Some(s)) => s,
            (d, None) => d.unwrap_or_default(),
        };
        Self {
            id: raw.id.or(raw.transaction_id).unwrap_or_default(),
            customer: raw.customer,
            amount: raw.amount,
            location: raw.location,
            channel: raw.channel,
            kind: raw.kind,
            risk_score: raw.risk_score,
            decision,
            reason: raw.reason.or(raw.ai_reason),
            timestamp: raw.timestamp,
        }
    }
}

impl Transaction {
    /// Create a transaction with only the fields the console keys on.
    pub fn new(id: impl Into<String>, amount: f64, risk_score: f64) -> Self {
        Self {
            id: id.into(),
            customer: String::new(),
            amount,
            location: String::new(),
            channel: String::new(),
            kind: String::new(),
            risk_score,
            decision: Decision::Unknown,
            reason: None,
            timestamp: None,
        }
    }
}

/// Server-side status filter for the transactions feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Blocked,
    Review,
    Approved,
}

impl StatusFilter {
    /// Value for the `status` query parameter; `None` means no filtering.
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Blocked => Some("Blocked"),
            StatusFilter::Review => Some("Review"),
            StatusFilter::Approved => Some("Approved"),
        }
    }

    /// Cycle to the next filter.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Blocked,
            StatusFilter::Blocked => StatusFilter::Review,
            StatusFilter::Review => StatusFilter::Approved,
            StatusFilter::Approved => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        self.query_value().unwrap_or("All")
    }

    /// Whether a decision passes this filter.
    pub fn matches(&self, decision: Decision) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Blocked => decision == Decision::Blocked,
            StatusFilter::Review => decision == Decision::Review,
            StatusFilter::Approved => decision == Decision::Approved,
        }
    }
}

// Timestamps arrive as ISO strings or as epoch numbers.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

// Scores arrive as ints, floats, or occasionally as numeric strings.
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or_default(),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_banking_shape() {
        let json = r#"{
            "_id": "65f0",
            "id": "TXN-482913",
            "customer": "Ada",
            "amount": 15000.5,
            "location": "High Risk Zone",
            "channel": "Web",
            "type": "Credit",
            "risk_score": 88,
            "ai_reason": "High amount, risky location",
            "status": "Blocked"
        }"#;

        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.id, "TXN-482913");
        assert_eq!(txn.kind, "Credit");
        assert_eq!(txn.risk_score, 88.0);
        assert_eq!(txn.decision, Decision::Blocked);
        assert_eq!(txn.reason.as_deref(), Some("High amount, risky location"));
    }

    #[test]
    fn decodes_analysis_shape() {
        let json = r#"{"transaction_id": "T-9", "decision": "Review", "risk_score": "64.5"}"#;

        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.id, "T-9");
        assert_eq!(txn.decision, Decision::Review);
        assert_eq!(txn.risk_score, 64.5);
        assert!(txn.customer.is_empty());
    }

    #[test]
    fn decision_beats_workflow_status() {
        let json = r#"{"transaction_id": "T-2", "status": "Resolved", "decision": "Approved"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.decision, Decision::Approved);
    }

    #[test]
    fn unknown_decision_is_tolerated() {
        let json = r#"{"id": "T-1", "status": "Escalated"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.decision, Decision::Unknown);
        assert_eq!(txn.decision.label(), "-");
    }

    #[test]
    fn status_filter_cycles_back_to_all() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            filter = filter.next();
            seen.push(filter);
        }
        assert_eq!(
            seen,
            vec![
                StatusFilter::Blocked,
                StatusFilter::Review,
                StatusFilter::Approved,
                StatusFilter::All
            ]
        );
        assert_eq!(StatusFilter::All.query_value(), None);
        assert_eq!(StatusFilter::Review.label(), "Review");
    }

    #[test]
    fn status_filter_matches_decisions() {
        assert!(StatusFilter::All.matches(Decision::Unknown));
        assert!(StatusFilter::Blocked.matches(Decision::Blocked));
        assert!(!StatusFilter::Blocked.matches(Decision::Review));
    }
}
