//! Research-worthiness scoring types.
//!
//! A market is worth paying for outside research only when new information
//! could plausibly move its probability. The score combines six factors,
//! each normalized to 0.0-1.0:
//!
//! - **Information dependence**: outcome hinges on facts that can be looked up
//! - **Accessibility**: those facts are public rather than insider knowledge
//! - **Ambiguity**: the current price is far from a settled 0 or 1
//! - **Time sufficiency**: enough time remains for research to be actionable
//! - **Efficiency risk** (inverted): deep, busy markets are already priced well
//! - **Randomness risk** (inverted): chance-driven outcomes resist research
//!
//! # Examples
//!
//! ```
//! use edgescout::domain::worthiness::{WorthinessFactors, WorthinessWeights};
//!
//! let factors = WorthinessFactors {
//!     information_dependence: 0.9,
//!     accessibility: 0.8,
//!     ambiguity: 0.7,
//!     time_sufficiency: 1.0,
//!     efficiency_risk: 0.3,
//!     randomness_risk: 0.2,
//! };
//!
//! let score = factors.composite(&WorthinessWeights::default());
//! assert!(score > 0.7);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Individual worthiness factors for a market.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorthinessFactors {
    pub information_dependence: f64,
    pub accessibility: f64,
    pub ambiguity: f64,
    pub time_sufficiency: f64,
    /// Likelihood the market is already efficiently priced. Higher is worse.
    pub efficiency_risk: f64,
    /// Degree to which the outcome is down to chance. Higher is worse.
    pub randomness_risk: f64,
}

impl WorthinessFactors {
    /// Weighted average of the factors, with both risks inverted.
    #[must_use]
    pub fn composite(&self, weights: &WorthinessWeights) -> f64 {
        let weighted_sum = self.information_dependence * weights.information_dependence
            + self.accessibility * weights.accessibility
            + self.ambiguity * weights.ambiguity
            + self.time_sufficiency * weights.time_sufficiency
            + (1.0 - self.efficiency_risk) * weights.efficiency_risk
            + (1.0 - self.randomness_risk) * weights.randomness_risk;

        let weight_sum = weights.information_dependence
            + weights.accessibility
            + weights.ambiguity
            + weights.time_sufficiency
            + weights.efficiency_risk
            + weights.randomness_risk;

        if weight_sum == 0.0 {
            0.0
        } else {
            (weighted_sum / weight_sum).clamp(0.0, 1.0)
        }
    }
}

/// Weights for combining worthiness factors into a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorthinessWeights {
    pub information_dependence: f64,
    pub accessibility: f64,
    pub ambiguity: f64,
    pub time_sufficiency: f64,
    pub efficiency_risk: f64,
    pub randomness_risk: f64,
}

impl Default for WorthinessWeights {
    fn default() -> Self {
        Self {
            information_dependence: 0.30,
            accessibility: 0.15,
            ambiguity: 0.15,
            time_sufficiency: 0.15,
            efficiency_risk: 0.10,
            randomness_risk: 0.15,
        }
    }
}

/// Research priority bucket derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::High
        } else if score >= 0.65 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A market's worthiness verdict with its contributing factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorthinessScore {
    pub factors: WorthinessFactors,
    pub score: f64,
    pub priority: Priority,
    pub qualifies: bool,
    pub reasons: Vec<String>,
}

impl WorthinessScore {
    /// A zero score for markets that cannot benefit from research at all.
    #[must_use]
    pub fn disqualified(reason: impl Into<String>) -> Self {
        Self {
            factors: WorthinessFactors::default(),
            score: 0.0,
            priority: Priority::Low,
            qualifies: false,
            reasons: vec![reason.into()],
        }
    }

    /// One-line summary suitable for logs and reports.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.reasons.is_empty() {
            format!("Score: {:.2}.", self.score)
        } else {
            format!("Score: {:.2}. {}", self.score, self.reasons.join("; "))
        }
    }
}
