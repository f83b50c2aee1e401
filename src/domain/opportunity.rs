//! Opportunity type and expected-value scoring.
//!
//! An `Opportunity` joins a market snapshot with a non-abstaining judgment.
//! Edge and score are derived once at construction and never change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::judgment::{Decision, Judgment};
use super::market::MarketRecord;

/// Edge at which the edge factor saturates.
const FULL_EDGE: f64 = 0.20;

/// Weights for combining opportunity factors into a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpportunityWeights {
    pub edge: f64,
    pub confidence: f64,
    pub liquidity: f64,
    pub time: f64,
}

impl Default for OpportunityWeights {
    fn default() -> Self {
        Self {
            edge: 0.40,
            confidence: 0.30,
            liquidity: 0.20,
            time: 0.10,
        }
    }
}

/// Normalized edge: reaches 1.0 at a 20-point mispricing.
#[must_use]
pub fn edge_factor(edge: f64) -> f64 {
    (edge / FULL_EDGE).clamp(0.0, 1.0)
}

/// Log-scaled liquidity: 0.0 at $1k, 1.0 at $100k.
#[must_use]
pub fn liquidity_factor(liquidity: f64) -> f64 {
    if liquidity <= 0.0 {
        return 0.0;
    }
    ((liquidity / 1000.0).log10() / 2.0).clamp(0.0, 1.0)
}

/// Preference for resolutions one to four weeks out.
#[must_use]
pub fn time_factor(days: Option<f64>) -> f64 {
    match days {
        None => 0.5,
        Some(d) if (7.0..=30.0).contains(&d) => 1.0,
        Some(d) if (1.0..7.0).contains(&d) => 0.5 + (d - 1.0) / 6.0 * 0.5,
        Some(d) if d > 30.0 && d <= 90.0 => 1.0 - (d - 30.0) / 60.0 * 0.5,
        Some(_) => 0.0,
    }
}

/// A ranked trade recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    market: MarketRecord,
    judgment: Judgment,
    edge: f64,
    score: f64,
}

impl Opportunity {
    /// Join a market with its judgment and compute edge and score.
    ///
    /// Fails for abstaining judgments; the edge threshold is applied by the
    /// ranking stage.
    pub fn evaluate(
        market: MarketRecord,
        judgment: Judgment,
        weights: &OpportunityWeights,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if judgment.is_abstain() {
            return Err(DomainError::AbstainingJudgment);
        }

        let edge = (judgment.estimated_probability() - market.implied_probability).abs();
        let score = weights.edge * edge_factor(edge)
            + weights.confidence * judgment.confidence.weight()
            + weights.liquidity * liquidity_factor(market.liquidity)
            + weights.time * time_factor(market.days_to_resolution(now));

        Ok(Self {
            market,
            judgment,
            edge,
            score,
        })
    }

    pub fn market(&self) -> &MarketRecord {
        &self.market
    }

    pub fn judgment(&self) -> &Judgment {
        &self.judgment
    }

    pub fn decision(&self) -> Decision {
        self.judgment.decision
    }

    /// Absolute gap between estimated and implied probability.
    pub fn edge(&self) -> f64 {
        self.edge
    }

    /// Signed gap, positive when the market underprices YES.
    pub fn signed_edge(&self) -> f64 {
        self.judgment.estimated_probability() - self.market.implied_probability
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Plain-language reading of the mispricing.
    pub fn explanation(&self) -> String {
        let implied = self.market.implied_probability * 100.0;
        let estimated = self.judgment.estimated_probability() * 100.0;
        let direction = if self.signed_edge() > 0.0 {
            "underpriced"
        } else {
            "overpriced"
        };
        format!(
            "Market prices YES at {implied:.1}% vs estimated {estimated:.1}%; YES looks {direction} by {:.1} points ({} confidence).",
            self.edge * 100.0,
            self.judgment.confidence,
        )
    }
}
