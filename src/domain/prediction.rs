//! Judgment history kept for calibration.
//!
//! Every market that reaches the judgment stage leaves one
//! [`PredictionRecord`], whether or not it ends up in the report, so the
//! estimates can later be compared with how the markets resolved.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MarketId, RunId};
use super::judgment::{Confidence, Decision, Judgment};
use super::market::MarketRecord;

/// Longest research excerpt kept on a record, in characters.
pub const MAX_RESEARCH_CHARS: usize = 500;

/// What the ranking stage did with a judged market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionOutcome {
    Reported,
    /// Withheld by the cooldown.
    Suppressed,
    /// Cut by the report size limit.
    Truncated,
    BelowThreshold,
    Abstained,
}

impl PredictionOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reported => "reported",
            Self::Suppressed => "suppressed",
            Self::Truncated => "truncated",
            Self::BelowThreshold => "below_threshold",
            Self::Abstained => "abstained",
        }
    }
}

impl fmt::Display for PredictionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictionOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reported" => Ok(Self::Reported),
            "suppressed" => Ok(Self::Suppressed),
            "truncated" => Ok(Self::Truncated),
            "below_threshold" => Ok(Self::BelowThreshold),
            "abstained" => Ok(Self::Abstained),
            other => Err(format!("unknown prediction outcome '{other}'")),
        }
    }
}

/// One judged market, as it stood when the run judged it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub run_id: RunId,
    pub market_id: MarketId,
    pub title: String,
    pub recorded_at: DateTime<Utc>,
    pub implied_probability: f64,
    pub estimated_probability: f64,
    pub decision: Decision,
    pub confidence: Confidence,
    pub outcome: PredictionOutcome,
    pub rationale: String,
    /// Start of the research notes the judgment was based on.
    pub research_excerpt: Option<String>,
}

impl PredictionRecord {
    #[must_use]
    pub fn new(
        run_id: RunId,
        market: &MarketRecord,
        judgment: &Judgment,
        outcome: PredictionOutcome,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            market_id: market.id.clone(),
            title: market.title.clone(),
            recorded_at,
            implied_probability: market.implied_probability,
            estimated_probability: judgment.estimated_probability(),
            decision: judgment.decision,
            confidence: judgment.confidence,
            outcome,
            rationale: judgment.rationale.clone(),
            research_excerpt: None,
        }
    }

    /// Attach the research notes, truncated to [`MAX_RESEARCH_CHARS`].
    #[must_use]
    pub fn with_research(mut self, notes: &str) -> Self {
        self.research_excerpt = Some(notes.chars().take(MAX_RESEARCH_CHARS).collect());
        self
    }

    /// Estimated minus implied probability; positive when YES looks cheap.
    #[must_use]
    pub fn signed_edge(&self) -> f64 {
        self.estimated_probability - self.implied_probability
    }
}
