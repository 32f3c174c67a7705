//! Analyst actions against the backend.
//!
//! Actions are fire-and-forget from the UI's point of view: [`ActionRunner`]
//! spawns the request and the outcome comes back through a channel that the
//! UI loop drains.

use std::path::PathBuf;

use fraudwatch_client::{BackendClient, BackendError, TransactionVerdict};
use fraudwatch_types::{ActionResponse, Decision, Download, ExportFormat, StatusFilter};
use serde_json::{Map, Value};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Something the analyst asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    Judge {
        transaction_id: String,
        verdict: TransactionVerdict,
    },
    Escalate {
        alert_id: String,
    },
    Assign {
        alert_id: String,
        user: String,
    },
    /// Close the alert raised for a transaction.
    Resolve {
        transaction_id: String,
        decision: Decision,
    },
    ExportTransactions {
        format: ExportFormat,
        filter: StatusFilter,
    },
    ExportAudit {
        format: ExportFormat,
    },
    GenerateReport {
        name: String,
        format: ExportFormat,
    },
}

impl DashboardAction {
    /// Title used for the notification about this action.
    pub fn title(&self) -> &'static str {
        match self {
            DashboardAction::Judge { verdict, .. } => match verdict {
                TransactionVerdict::Approve => "Approve transaction",
                TransactionVerdict::Block => "Block transaction",
                TransactionVerdict::Review => "Flag for review",
            },
            DashboardAction::Escalate { .. } => "Escalate alert",
            DashboardAction::Assign { .. } => "Assign alert",
            DashboardAction::Resolve { .. } => "Resolve alert",
            DashboardAction::ExportTransactions { .. } => "Export transactions",
            DashboardAction::ExportAudit { .. } => "Export audit log",
            DashboardAction::GenerateReport { .. } => "Generate report",
        }
    }

    /// Message shown when the backend does not supply one.
    fn default_message(&self) -> String {
        match self {
            DashboardAction::Judge {
                transaction_id,
                verdict,
            } => format!("{} marked {}", transaction_id, verdict_decision(*verdict).label()),
            DashboardAction::Escalate { alert_id } => format!("Alert {} escalated", alert_id),
            DashboardAction::Assign { alert_id, user } => {
                format!("Alert {} assigned to {}", alert_id, user)
            }
            DashboardAction::Resolve {
                transaction_id,
                decision,
            } => format!("Alert for {} resolved as {}", transaction_id, decision.label()),
            DashboardAction::ExportTransactions { .. }
            | DashboardAction::ExportAudit { .. }
            | DashboardAction::GenerateReport { .. } => "Export ready".to_string(),
        }
    }
}

/// Decision a verdict leaves on the transaction.
pub fn verdict_decision(verdict: TransactionVerdict) -> Decision {
    match verdict {
        TransactionVerdict::Approve => Decision::Approved,
        TransactionVerdict::Block => Decision::Blocked,
        TransactionVerdict::Review => Decision::Review,
    }
}

/// What a successful action produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub message: String,
    /// Absolute link to an exported file.
    pub link: Option<String>,
    /// Where the exported file was saved, if it was downloaded.
    pub saved: Option<PathBuf>,
}

/// Result of one dispatched action.
#[derive(Debug)]
pub struct ActionOutcome {
    pub action: DashboardAction,
    pub result: Result<ActionReport, BackendError>,
}

/// Runs actions on the tokio runtime and collects their outcomes.
#[derive(Debug)]
pub struct ActionRunner {
    client: BackendClient,
    runtime: Handle,
    download_dir: Option<PathBuf>,
    tx: mpsc::UnboundedSender<ActionOutcome>,
    rx: mpsc::UnboundedReceiver<ActionOutcome>,
}

impl ActionRunner {
    pub fn new(client: BackendClient, runtime: Handle, download_dir: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            runtime,
            download_dir,
            tx,
            rx,
        }
    }

    /// Start an action. The outcome arrives through [`try_next`](Self::try_next).
    pub fn dispatch(&self, action: DashboardAction) {
        tracing::info!(action = action.title(), "dispatching action");
        let client = self.client.clone();
        let download_dir = self.download_dir.clone();
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = run(&client, &action, download_dir).await;
            if let Err(ref err) = result {
                tracing::warn!(action = action.title(), error = %err, "action failed");
            }
            let _ = tx.send(ActionOutcome { action, result });
        });
    }

    /// Next finished action, if any.
    pub fn try_next(&mut self) -> Option<ActionOutcome> {
        self.rx.try_recv().ok()
    }
}

async fn run(
    client: &BackendClient,
    action: &DashboardAction,
    download_dir: Option<PathBuf>,
) -> Result<ActionReport, BackendError> {
    let response = match action {
        DashboardAction::Judge {
            transaction_id,
            verdict,
        } => client.judge_transaction(transaction_id, *verdict).await?,
        DashboardAction::Escalate { alert_id } => client.escalate_alert(alert_id).await?,
        DashboardAction::Assign { alert_id, user } => client.assign_alert(alert_id, user).await?,
        DashboardAction::Resolve {
            transaction_id,
            decision,
        } => client.resolve_alert(transaction_id, *decision).await?,
        DashboardAction::ExportTransactions { format, filter } => {
            let mut filters = Map::new();
            if let Some(status) = filter.query_value() {
                filters.insert("status".to_string(), Value::from(status));
            }
            let download = client.export_data("transactions", *format, filters).await?;
            return fetch(client, download, download_dir).await;
        }
        DashboardAction::ExportAudit { format } => {
            let download = client.export_audit(*format, Map::new()).await?;
            return fetch(client, download, download_dir).await;
        }
        DashboardAction::GenerateReport { name, format } => {
            let download = client.generate_report(name, *format).await?;
            return fetch(client, download, download_dir).await;
        }
    };

    Ok(report(action, &response))
}

fn report(action: &DashboardAction, response: &ActionResponse) -> ActionReport {
    ActionReport {
        message: response
            .message
            .clone()
            .unwrap_or_else(|| action.default_message()),
        link: None,
        saved: None,
    }
}

async fn fetch(
    client: &BackendClient,
    download: Download,
    download_dir: Option<PathBuf>,
) -> Result<ActionReport, BackendError> {
    let saved = match download_dir {
        Some(dir) => Some(client.download(&download, &dir).await?),
        None => None,
    };
    let message = match &saved {
        Some(path) => format!("Saved to {}", path.display()),
        None => format!("Download at {}", download.download_url),
    };
    Ok(ActionReport {
        message,
        link: Some(download.download_url),
        saved,
    })
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

    async fn outcome(runner: &mut ActionRunner) -> ActionOutcome {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Some(outcome) = runner.try_next() {
                    return outcome;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("action did not finish")
    }

    #[tokio::test]
    async fn judge_uses_backend_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/transactions/TXN-1/approve");
            then.status(200)
                .json_body(json!({"success": true, "message": "Transaction approved"}));
        });

        let mut runner = ActionRunner::new(client_for(&server), Handle::current(), None);
        runner.dispatch(DashboardAction::Judge {
            transaction_id: "TXN-1".to_string(),
            verdict: TransactionVerdict::Approve,
        });

        let outcome = outcome(&mut runner).await;
        assert_eq!(outcome.result.unwrap().message, "Transaction approved");
    }

    #[tokio::test]
    async fn falls_back_to_default_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/alerts/a9/escalate");
            then.status(200).json_body(json!({"success": true}));
        });

        let mut runner = ActionRunner::new(client_for(&server), Handle::current(), None);
        runner.dispatch(DashboardAction::Escalate {
            alert_id: "a9".to_string(),
        });

        let outcome = outcome(&mut runner).await;
        assert_eq!(outcome.action.title(), "Escalate alert");
        assert_eq!(outcome.result.unwrap().message, "Alert a9 escalated");
    }

    #[tokio::test]
    async fn rejection_is_an_error_outcome() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PATCH).path("/api/alerts/TXN-5");
            then.status(200)
                .json_body(json!({"success": false, "message": "Alert already closed"}));
        });

        let mut runner = ActionRunner::new(client_for(&server), Handle::current(), None);
        runner.dispatch(DashboardAction::Resolve {
            transaction_id: "TXN-5".to_string(),
            decision: Decision::Blocked,
        });

        let err = outcome(&mut runner).await.result.unwrap_err();
        assert_eq!(err.to_string(), "Alert already closed");
    }

    #[tokio::test]
    async fn export_without_download_dir_reports_link() {
        let server = MockServer::start_async().await;
        let export = server.mock(|when, then| {
            when.method(POST)
                .path("/api/export/transactions")
                .json_body(json!({"format": "CSV", "filters": {"status": "Blocked"}}));
            then.status(200)
                .json_body(json!({"success": true, "download_url": "/files/txns.csv"}));
        });

        let mut runner = ActionRunner::new(client_for(&server), Handle::current(), None);
        runner.dispatch(DashboardAction::ExportTransactions {
            format: ExportFormat::Csv,
            filter: StatusFilter::Blocked,
        });

        let report = outcome(&mut runner).await.result.unwrap();
        assert_eq!(export.calls(), 1);
        assert_eq!(report.link.as_deref(), Some(server.url("/files/txns.csv").as_str()));
        assert!(report.saved.is_none());
    }

    #[tokio::test]
    async fn export_with_download_dir_saves_file() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/reports/generate");
            then.status(200)
                .json_body(json!({"success": true, "download_url": "/files/weekly.pdf"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/files/weekly.pdf");
            then.status(200).body("%PDF-1.4");
        });

        let dir = tempfile::tempdir().unwrap();
        let mut runner = ActionRunner::new(
            client_for(&server),
            Handle::current(),
            Some(dir.path().to_path_buf()),
        );
        runner.dispatch(DashboardAction::GenerateReport {
            name: "Weekly".to_string(),
            format: ExportFormat::Pdf,
        });

        let report = outcome(&mut runner).await.result.unwrap();
        let saved = report.saved.unwrap();
        assert_eq!(saved, dir.path().join("weekly.pdf"));
        assert_eq!(std::fs::read_to_string(saved).unwrap(), "%PDF-1.4");
    }
}
