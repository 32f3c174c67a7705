//! Typed endpoints of the fraud-monitoring backend.

use reqwest::Method;
use serde_json::{Map, Value};

use fraudwatch_types::{
    ActionResponse, Alert, AssignRequest, AuditEntry, DashboardStats, Decision, DecisionUpdate,
    Download, ExportFormat, ExportRequest, ReportRequest, StatusFilter, Transaction,
};

use crate::{BackendClient, BackendError};

/// What an analyst can do to a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionVerdict {
    Approve,
    Block,
    Review,
}

impl TransactionVerdict {
    fn path_segment(&self) -> &'static str {
        match self {
            TransactionVerdict::Approve => "approve",
            TransactionVerdict::Block => "block",
            TransactionVerdict::Review => "review",
        }
    }
}

impl BackendClient {
    /// Latest transactions, newest first, filtered server-side.
    pub async fn transactions(
        &self,
        filter: StatusFilter,
        limit: usize,
    ) -> Result<Vec<Transaction>, BackendError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(status) = filter.query_value() {
            query.push(("status", status.to_string()));
        }
        self.list("/api/transactions", &query).await
    }

    /// KPI block and model metrics.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, BackendError> {
        self.get("/api/stats/dashboard", &[]).await
    }

    /// Pending alerts.
    pub async fn alerts(&self) -> Result<Vec<Alert>, BackendError> {
        self.list("/api/alerts", &[]).await
    }

    /// Audit log, optionally filtered (`user`, `action`, ...).
    pub async fn audit_logs(
        &self,
        filters: &[(&str, String)],
    ) -> Result<Vec<AuditEntry>, BackendError> {
        self.list("/api/audit/logs", filters).await
    }

    pub async fn judge_transaction(
        &self,
        id: &str,
        verdict: TransactionVerdict,
    ) -> Result<ActionResponse, BackendError> {
        let path = format!("/api/transactions/{}/{}", segment(id), verdict.path_segment());
        self.action::<()>(Method::POST, &path, None).await
    }

    pub async fn approve_transaction(&self, id: &str) -> Result<ActionResponse, BackendError> {
        self.judge_transaction(id, TransactionVerdict::Approve).await
    }

    pub async fn block_transaction(&self, id: &str) -> Result<ActionResponse, BackendError> {
        self.judge_transaction(id, TransactionVerdict::Block).await
    }

    pub async fn review_transaction(&self, id: &str) -> Result<ActionResponse, BackendError> {
        self.judge_transaction(id, TransactionVerdict::Review).await
    }

    /// Escalate an alert by its storage id.
    pub async fn escalate_alert(&self, alert_id: &str) -> Result<ActionResponse, BackendError> {
        let path = format!("/api/alerts/{}/escalate", segment(alert_id));
        self.action::<()>(Method::POST, &path, None).await
    }

    /// Assign an alert to an analyst.
    pub async fn assign_alert(
        &self,
        alert_id: &str,
        user_id: &str,
    ) -> Result<ActionResponse, BackendError> {
        let path = format!("/api/alerts/{}/assign", segment(alert_id));
        let body = AssignRequest {
            user_id: user_id.to_string(),
        };
        self.action(Method::POST, &path, Some(&body)).await
    }

    /// Close the alert raised for `transaction_id` with a decision.
    pub async fn resolve_alert(
        &self,
        transaction_id: &str,
        decision: Decision,
    ) -> Result<ActionResponse, BackendError> {
        let path = format!("/api/alerts/{}", segment(transaction_id));
        let body = DecisionUpdate { status: decision };
        self.action(Method::PATCH, &path, Some(&body)).await
    }

    /// Export a data set (`transactions`, `alerts`, ...).
    pub async fn export_data(
        &self,
        kind: &str,
        format: ExportFormat,
        filters: Map<String, Value>,
    ) -> Result<Download, BackendError> {
        let path = format!("/api/export/{}", segment(kind));
        self.export(&path, &ExportRequest { format, filters }).await
    }

    pub async fn export_audit(
        &self,
        format: ExportFormat,
        filters: Map<String, Value>,
    ) -> Result<Download, BackendError> {
        let path = format!("/api/audit/export/{}", format.path_segment());
        self.export(&path, &ExportRequest { format, filters }).await
    }

    pub async fn generate_report(
        &self,
        name: &str,
        kind: ExportFormat,
    ) -> Result<Download, BackendError> {
        let body = ReportRequest {
            name: name.to_string(),
            kind,
        };
        self.export("/api/reports/generate", &body).await
    }
}

// Ids end up in URL paths.
fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::builder()
            .endpoint(server.base_url())
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn ids_are_escaped() {
        assert_eq!(segment("TXN-1001"), "TXN-1001");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[tokio::test]
    async fn transactions_pass_filter_and_limit() {
        let server = MockServer::start_async().await;
        let filtered = server.mock(|when, then| {
            when.method(GET)
                .path("/api/transactions")
                .query_param("status", "Blocked")
                .query_param("limit", "50");
            then.status(200).json_body(json!({"items": [
                {"id": "TXN-1", "amount": 9000, "risk_score": 92, "status": "Blocked"}
            ]}));
        });

        let client = client_for(&server);
        let txns = client.transactions(StatusFilter::Blocked, 50).await.unwrap();

        assert_eq!(filtered.calls(), 1);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].decision, Decision::Blocked);
    }

    #[tokio::test]
    async fn all_filter_omits_status() {
        let server = MockServer::start_async().await;
        let unfiltered = server.mock(|when, then| {
            when.method(GET)
                .path("/api/transactions")
                .query_param("limit", "20");
            then.status(200).json_body(json!([]));
        });

        let client = client_for(&server);
        let txns = client.transactions(StatusFilter::All, 20).await.unwrap();

        assert_eq!(unfiltered.calls(), 1);
        assert!(txns.is_empty());
    }

    #[tokio::test]
    async fn dashboard_stats_decode() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/stats/dashboard");
            then.status(200).json_body(json!({
                "kpis": {"alerts": 3, "total_txns": 120, "blocked": 7, "fraud_rate": 5.8},
                "ml_metrics": {"model_active": true, "engine_version": "v2"}
            }));
        });

        let stats = client_for(&server).dashboard_stats().await.unwrap();
        assert_eq!(stats.kpis.total_txns, 120);
        assert_eq!(stats.kpis.blocked, 7);
        assert!(stats.ml_metrics.is_some_and(|m| m.model_active));
    }

    #[tokio::test]
    async fn block_posts_to_action_path() {
        let server = MockServer::start_async().await;
        let block = server.mock(|when, then| {
            when.method(POST).path("/api/transactions/TXN-7/block");
            then.status(200)
                .json_body(json!({"success": true, "message": "Transaction blocked"}));
        });

        let response = client_for(&server).block_transaction("TXN-7").await.unwrap();

        assert_eq!(block.calls(), 1);
        assert_eq!(response.message.as_deref(), Some("Transaction blocked"));
    }

    #[tokio::test]
    async fn assign_sends_user() {
        let server = MockServer::start_async().await;
        let assign = server.mock(|when, then| {
            when.method(POST)
                .path("/api/alerts/65a1/assign")
                .json_body(json!({"user_id": "analyst-2"}));
            then.status(200).json_body(json!({"success": true}));
        });

        client_for(&server).assign_alert("65a1", "analyst-2").await.unwrap();
        assert_eq!(assign.calls(), 1);
    }

    #[tokio::test]
    async fn resolve_patches_decision() {
        let server = MockServer::start_async().await;
        let resolve = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/alerts/TXN-9")
                .json_body(json!({"status": "Approved"}));
            then.status(200).json_body(json!({"status": "success"}));
        });

        client_for(&server)
            .resolve_alert("TXN-9", Decision::Approved)
            .await
            .unwrap();
        assert_eq!(resolve.calls(), 1);
    }

    #[tokio::test]
    async fn escalate_failure_surfaces_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/alerts/65a1/escalate");
            then.status(200)
                .json_body(json!({"success": false, "message": "Already escalated"}));
        });

        let err = client_for(&server).escalate_alert("65a1").await.unwrap_err();
        assert_eq!(err.to_string(), "Already escalated");
    }

    #[tokio::test]
    async fn audit_export_uses_format_path() {
        let server = MockServer::start_async().await;
        let export = server.mock(|when, then| {
            when.method(POST)
                .path("/api/audit/export/pdf")
                .json_body(json!({"format": "PDF", "filters": {}}));
            then.status(200).json_body(json!({
                "success": true,
                "download_url": "/api/audit/download/pdf/3"
            }));
        });

        let download = client_for(&server)
            .export_audit(ExportFormat::Pdf, Map::new())
            .await
            .unwrap();

        assert_eq!(export.calls(), 1);
        assert_eq!(download.download_url, server.url("/api/audit/download/pdf/3"));
    }

    #[tokio::test]
    async fn report_request_body() {
        let server = MockServer::start_async().await;
        let report = server.mock(|when, then| {
            when.method(POST)
                .path("/api/reports/generate")
                .json_body(json!({"name": "Weekly", "type": "CSV"}));
            then.status(200).json_body(json!({
                "success": true,
                "download_url": "https://files.example/reports/weekly.csv"
            }));
        });

        let download = client_for(&server)
            .generate_report("Weekly", ExportFormat::Csv)
            .await
            .unwrap();

        assert_eq!(report.calls(), 1);
        assert_eq!(download.download_url, "https://files.example/reports/weekly.csv");
    }
}
