//! Risk classification for display.
//!
//! The backend makes the actual decision; these thresholds only decide how
//! a score is coloured and labelled in the console.

use serde::{Deserialize, Serialize};

/// Score thresholds, on the backend's 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Scores above this are shown as needing review.
    pub review: f64,
    /// Scores above this are shown as high risk.
    pub block: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            review: 60.0,
            block: 85.0,
        }
    }
}

impl RiskThresholds {
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score > self.block {
            RiskLevel::High
        } else if score > self.review {
            RiskLevel::Elevated
        } else {
            RiskLevel::Low
        }
    }
}

/// Display bucket for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Elevated,
    High,
}

impl RiskLevel {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Elevated => "MED",
            RiskLevel::High => "HIGH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        let t = RiskThresholds::default();
        assert_eq!(t.classify(12.0), RiskLevel::Low);
        assert_eq!(t.classify(60.0), RiskLevel::Low);
        assert_eq!(t.classify(60.5), RiskLevel::Elevated);
        assert_eq!(t.classify(85.0), RiskLevel::Elevated);
        assert_eq!(t.classify(91.0), RiskLevel::High);
    }

    #[test]
    fn custom_thresholds() {
        let t = RiskThresholds {
            review: 40.0,
            block: 70.0,
        };
        assert_eq!(t.classify(50.0), RiskLevel::Elevated);
        assert_eq!(t.classify(71.0), RiskLevel::High);
    }
}
