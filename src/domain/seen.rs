//! Record of markets already included in an outgoing report.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::id::MarketId;
use super::judgment::Decision;

/// Last time a market+decision pair was reported.
///
/// The only state that outlives a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenMarket {
    pub market_id: MarketId,
    pub decision: Decision,
    pub reported_at: DateTime<Utc>,
}

impl SeenMarket {
    pub fn new(market_id: MarketId, decision: Decision, reported_at: DateTime<Utc>) -> Self {
        Self {
            market_id,
            decision,
            reported_at,
        }
    }

    /// Whether a report at `now` would still fall inside the cooldown.
    ///
    /// A timestamp in the future (clock skew) counts as inside the window.
    #[must_use]
    pub fn suppresses(&self, decision: Decision, now: DateTime<Utc>, cooldown: Duration) -> bool {
        self.decision == decision && now - self.reported_at < cooldown
    }
}
