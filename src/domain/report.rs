//! Per-run report and notification payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MarketId, RunId};
use super::judgment::{Confidence, Decision};
use super::opportunity::Opportunity;

/// Stage counters for a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub scanned: usize,
    pub filtered: usize,
    pub worthy: usize,
    pub researched: usize,
    pub judged: usize,
    pub opportunities: usize,
    /// Opportunities withheld because of the cooldown.
    pub suppressed: usize,
    pub research_failures: usize,
    pub judgment_failures: usize,
    /// The run deadline cut off outstanding collaborator calls.
    pub timed_out: bool,
}

/// Everything recorded about one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub run_at: DateTime<Utc>,
    pub stats: RunStats,
    pub opportunities: Vec<Opportunity>,
}

impl RunReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

/// One line of a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEntry {
    pub market_id: MarketId,
    pub title: String,
    pub decision: Decision,
    pub implied_probability: f64,
    pub estimated_probability: f64,
    pub edge: f64,
    pub score: f64,
    pub confidence: Confidence,
    pub rationale: String,
    pub url: String,
}

impl From<&Opportunity> for NotificationEntry {
    fn from(opp: &Opportunity) -> Self {
        Self {
            market_id: opp.market().id.clone(),
            title: opp.market().title.clone(),
            decision: opp.decision(),
            implied_probability: opp.market().implied_probability,
            estimated_probability: opp.judgment().estimated_probability(),
            edge: opp.edge(),
            score: opp.score(),
            confidence: opp.judgment().confidence,
            rationale: opp.judgment().rationale.clone(),
            url: opp.market().url(),
        }
    }
}

/// Message handed to notification sinks. Never built for an empty run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub run_id: RunId,
    pub run_at: DateTime<Utc>,
    pub entries: Vec<NotificationEntry>,
}
