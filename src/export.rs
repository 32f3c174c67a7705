//! Local JSON snapshot of what the console shows.
//!
//! Used by the `w` key and by the non-interactive `--export` mode. This is
//! separate from the backend's own CSV/PDF exports.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use fraudwatch_client::BackendClient;
use fraudwatch_types::{Alert, DashboardStats, Decision, StatusFilter, Transaction};
use serde::Serialize;

use crate::data::{RiskLevel, RiskThresholds};

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<&'a DashboardStats>,
    pub transactions: Vec<TransactionRow<'a>>,
    pub alerts: &'a [Alert],
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub transactions: usize,
    pub approved: usize,
    pub review: usize,
    pub blocked: usize,
    pub high_risk: usize,
    pub alerts: usize,
}

#[derive(Debug, Serialize)]
pub struct TransactionRow<'a> {
    #[serde(flatten)]
    pub transaction: &'a Transaction,
    pub risk_level: &'static str,
}

impl<'a> Snapshot<'a> {
    pub fn build(
        stats: Option<&'a DashboardStats>,
        transactions: &'a [Transaction],
        alerts: &'a [Alert],
        thresholds: &RiskThresholds,
    ) -> Self {
        let count = |d: Decision| transactions.iter().filter(|t| t.decision == d).count();
        let summary = Summary {
            transactions: transactions.len(),
            approved: count(Decision::Approved),
            review: count(Decision::Review),
            blocked: count(Decision::Blocked),
            high_risk: transactions
                .iter()
                .filter(|t| thresholds.classify(t.risk_score) == RiskLevel::High)
                .count(),
            alerts: alerts.len(),
        };

        let transactions = transactions
            .iter()
            .map(|t| TransactionRow {
                transaction: t,
                risk_level: thresholds.classify(t.risk_score).symbol(),
            })
            .collect();

        Self {
            summary,
            stats,
            transactions,
            alerts,
        }
    }

    /// Write the snapshot as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// Fetch everything once and write a snapshot.
pub async fn export_once(
    client: &BackendClient,
    limit: usize,
    thresholds: &RiskThresholds,
    path: &Path,
) -> Result<()> {
    let (stats, transactions, alerts) = tokio::try_join!(
        client.dashboard_stats(),
        client.transactions(StatusFilter::All, limit),
        client.alerts(),
    )?;

    Snapshot::build(Some(&stats), &transactions, &alerts, thresholds).write_to(path)?;
    tracing::info!(path = %path.display(), transactions = transactions.len(), "snapshot exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    fn txn(id: &str, risk: f64, decision: Decision) -> Transaction {
        let mut t = Transaction::new(id, 10.0, risk);
        t.decision = decision;
        t
    }

    #[test]
    fn summary_counts() {
        let txns = vec![
            txn("T1", 95.0, Decision::Blocked),
            txn("T2", 70.0, Decision::Review),
            txn("T3", 5.0, Decision::Approved),
        ];
        let alerts = vec![Alert::new("a1", "T1")];

        let snapshot = Snapshot::build(None, &txns, &alerts, &RiskThresholds::default());
        assert_eq!(
            snapshot.summary,
            Summary {
                transactions: 3,
                approved: 1,
                review: 1,
                blocked: 1,
                high_risk: 1,
                alerts: 1,
            }
        );
        assert_eq!(snapshot.transactions[1].risk_level, "MED");
    }

    #[test]
    fn written_json_is_flat_per_transaction() {
        let txns = vec![txn("T1", 95.0, Decision::Blocked)];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        Snapshot::build(None, &txns, &[], &RiskThresholds::default())
            .write_to(&path)
            .unwrap();

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["transactions"][0]["id"], "T1");
        assert_eq!(value["transactions"][0]["risk_level"], "HIGH");
        assert!(value.get("stats").is_none());
    }

    #[tokio::test]
    async fn export_once_fetches_all_feeds() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/stats/dashboard");
            then.status(200).json_body(json!({"kpis": {"total_txns": 2, "blocked": 1}}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/transactions").query_param("limit", "25");
            then.status(200).json_body(json!({"items": [
                {"id": "T1", "risk_score": 90, "status": "Blocked"},
                {"id": "T2", "risk_score": 10, "status": "Approved"}
            ]}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/alerts");
            then.status(200).json_body(json!([{"_id": "a1", "transaction_id": "T1"}]));
        });

        let client = BackendClient::builder().endpoint(server.base_url()).build().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        export_once(&client, 25, &RiskThresholds::default(), &path).await.unwrap();

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["transactions"], 2);
        assert_eq!(value["summary"]["high_risk"], 1);
        assert_eq!(value["stats"]["kpis"]["blocked"], 1);
        assert_eq!(value["alerts"][0]["id"], "a1");
    }
}
