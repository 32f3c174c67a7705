//! Historical stats tracking for sparklines and rate calculations.

use std::collections::VecDeque;
use std::time::Instant;

use fraudwatch_types::DashboardStats;

/// Maximum number of historical samples to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks dashboard stats over time.
///
/// Each stats fetch adds one sample. The header uses it for trend
/// sparklines and the transaction rate.
#[derive(Debug, Clone, Default)]
pub struct StatsHistory {
    pub avg_risk: VecDeque<f64>,
    pub fraud_rate: VecDeque<f64>,
    pub total_txns: VecDeque<u64>,
    pub timestamps: VecDeque<Instant>,
    latest: Option<DashboardStats>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new stats sample
    pub fn record(&mut self, stats: DashboardStats, now: Instant) {
        push_bounded(&mut self.avg_risk, stats.kpis.avg_risk);
        push_bounded(&mut self.fraud_rate, stats.kpis.fraud_rate);
        push_bounded(&mut self.total_txns, stats.kpis.total_txns);
        push_bounded(&mut self.timestamps, now);
        self.latest = Some(stats);
    }

    /// Most recent stats, if any were fetched.
    pub fn latest(&self) -> Option<&DashboardStats> {
        self.latest.as_ref()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Average risk normalized to 0-7 for 8 bar levels.
    pub fn risk_sparkline(&self) -> Vec<u8> {
        normalize(&self.avg_risk)
    }

    pub fn fraud_rate_sparkline(&self) -> Vec<u8> {
        normalize(&self.fraud_rate)
    }

    /// Transactions per second between the last two samples.
    ///
    /// Returns None if there's not enough history to calculate a rate.
    pub fn txn_rate(&self) -> Option<f64> {
        if self.total_txns.len() < 2 || self.timestamps.len() < 2 {
            return None;
        }

        let current = *self.total_txns.back()?;
        let previous = *self.total_txns.get(self.total_txns.len() - 2)?;
        let delta = current as i64 - previous as i64;

        let current_time = self.timestamps.back()?;
        let previous_time = self.timestamps.get(self.timestamps.len() - 2)?;
        let elapsed = current_time.duration_since(*previous_time).as_secs_f64();

        if elapsed > 0.0 {
            Some(delta as f64 / elapsed)
        } else {
            None
        }
    }
}

fn push_bounded<T>(values: &mut VecDeque<T>, value: T) {
    values.push_back(value);
    if values.len() > MAX_HISTORY_SIZE {
        values.pop_front();
    }
}

/// Scale values into 0-7 relative to the observed range.
///
/// Returns an empty Vec if there's not enough history.
fn normalize(values: &VecDeque<f64>) -> Vec<u8> {
    if values.len() < 2 {
        return Vec::new();
    }

    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let range = max - min;

    values
        .iter()
        .map(|&v| {
            if range <= f64::EPSILON {
                0
            } else {
                (((v - min) / range * 7.0) as u8).min(7)
            }
        })
        .collect()
}
