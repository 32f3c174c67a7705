//! Dashboard statistics.
//!
//! Only the headline numbers are modelled. Chart series in the same payload
//! are ignored.

use serde::{Deserialize, Serialize};

/// Headline counters for the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kpis {
    /// Pending alerts.
    pub alerts: u64,
    pub total_txns: u64,
    pub blocked: u64,
    pub approved: u64,
    pub review: u64,
    /// Average risk score over recent transactions.
    pub avg_risk: f64,
    /// Blocked share of all transactions, in percent.
    pub fraud_rate: f64,
}

/// Status of the backend's scoring engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetrics {
    pub model_active: bool,
    pub engine_version: String,
    pub estimated_accuracy: f64,
    pub avg_inference_time: Option<String>,
}

/// Response of the dashboard stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub kpis: Kpis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_metrics: Option<ModelMetrics>,
}
