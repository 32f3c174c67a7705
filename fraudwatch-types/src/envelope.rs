//! Response envelopes and request bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::transaction::Decision;

/// Body of a list endpoint.
///
/// Endpoints answer either `{"items": [...]}` or a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Wrapped { items: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Wrapped { items } => items,
            ListResponse::Bare(items) => items,
        }
    }
}

/// Body of a mutating endpoint.
///
/// ```rust
/// use fraudwatch_types::ActionResponse;
///
/// let ok: ActionResponse = serde_json::from_str(r#"{"success": true, "message": "Transaction blocked"}"#).unwrap();
/// assert!(ok.is_success());
///
/// let legacy: ActionResponse = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
/// assert!(legacy.is_success());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Remaining resource fields (`alert`, `user`, `download_url`, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ActionResponse {
    /// Whether the backend reported success.
    ///
    /// An explicit `success` flag wins. Without one, `"status": "success"`
    /// counts as success; anything else is an application failure.
    pub fn is_success(&self) -> bool {
        match self.success {
            Some(flag) => flag,
            None => self
                .status
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("success")),
        }
    }

    /// Look up a resource field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The message to show a user, falling back to `default`.
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(default)
    }
}

/// A file produced by an export endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Download {
    pub download_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_id: Option<String>,
}

impl Download {
    /// Extract a download from a successful action response.
    pub fn from_response(response: &ActionResponse) -> Option<Self> {
        let url = response.field("download_url")?.as_str()?;
        if url.trim().is_empty() {
            return None;
        }
        Some(Self {
            download_url: url.to_string(),
            export_id: response
                .field("export_id")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// File format for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

impl ExportFormat {
    /// Lowercase path segment (`csv`, `pdf`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Body for resolving an alert with a decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionUpdate {
    pub status: Decision,
}

/// Body for assigning an alert to an analyst.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignRequest {
    pub user_id: String,
}

/// Body for export endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub filters: Map<String, Value>,
}

/// Body for report generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ExportFormat,
}
