//! Ranking and cooldown deduplication.
//!
//! The engine turns judged markets into the ordered list of opportunities
//! that will be reported. The seen-market store is only read here; the
//! entries for the reported opportunities come back in [`RankOutcome`] and
//! are written by the pipeline once the report is persisted. A suppressed
//! market therefore keeps the timestamp of its first alert.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::error::DomainError;
use crate::domain::judgment::Judgment;
use crate::domain::market::MarketRecord;
use crate::domain::opportunity::{Opportunity, OpportunityWeights};
use crate::domain::seen::SeenMarket;
use crate::error::Result;
use crate::port::SeenMarketStore;

/// Ranking thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    /// Smallest edge worth reporting.
    #[serde(default = "default_min_edge")]
    pub min_edge: f64,
    /// Hours before the same market+decision may be reported again.
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: u32,
    /// Most opportunities in one report.
    #[serde(default = "default_max_report")]
    pub max_report: usize,
}

const fn default_min_edge() -> f64 {
    0.05
}

const fn default_cooldown_hours() -> u32 {
    6
}

const fn default_max_report() -> usize {
    5
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_edge: default_min_edge(),
            cooldown_hours: default_cooldown_hours(),
            max_report: default_max_report(),
        }
    }
}

impl RankingConfig {
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::hours(i64::from(self.cooldown_hours))
    }
}

/// What happened to the judged markets.
#[derive(Debug, Clone, Default)]
pub struct RankOutcome {
    /// Opportunities to report, best first.
    pub reported: Vec<Opportunity>,
    /// Opportunities withheld by the cooldown.
    pub suppressed: Vec<Opportunity>,
    /// Opportunities cut by the top-N limit.
    pub truncated: Vec<Opportunity>,
    /// Non-abstaining judgments with edge under the minimum.
    pub below_threshold: usize,
    pub abstained: usize,
    /// Cooldown entries to record once the report is safely stored.
    pub seen: Vec<SeenMarket>,
}

/// Scores, filters, deduplicates and orders judged markets.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: RankingConfig,
    weights: OpportunityWeights,
}

impl RankingEngine {
    #[must_use]
    pub fn new(config: RankingConfig) -> Self {
        Self {
            config,
            weights: OpportunityWeights::default(),
        }
    }

    #[must_use]
    pub fn with_weights(mut self, weights: OpportunityWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank judged markets against the seen-market record.
    ///
    /// Nothing is written: [`RankOutcome::seen`] holds the entries that
    /// mark the reported opportunities as seen at `now`.
    ///
    /// The result depends only on the pairs and the store contents, not on
    /// the order of `pairs`.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn rank(
        &self,
        pairs: Vec<(MarketRecord, Judgment)>,
        store: &dyn SeenMarketStore,
        now: DateTime<Utc>,
    ) -> Result<RankOutcome> {
        let mut outcome = RankOutcome::default();
        let mut candidates = Vec::with_capacity(pairs.len());

        for (market, judgment) in pairs {
            match Opportunity::evaluate(market, judgment, &self.weights, now) {
                Ok(opp) if opp.edge() >= self.config.min_edge => candidates.push(opp),
                Ok(opp) => {
                    debug!(market_id = %opp.market().id, edge = opp.edge(), "Edge below minimum");
                    outcome.below_threshold += 1;
                }
                Err(DomainError::AbstainingJudgment) => outcome.abstained += 1,
                Err(e) => debug!(error = %e, "Judgment not rankable"),
            }
        }

        let cooldown = self.config.cooldown();
        let mut fresh = Vec::with_capacity(candidates.len());
        for opp in candidates {
            let seen = store.get(&opp.market().id, opp.decision()).await?;
            match seen {
                Some(seen) if seen.suppresses(opp.decision(), now, cooldown) => {
                    info!(
                        market_id = %opp.market().id,
                        decision = %opp.decision(),
                        reported_at = %seen.reported_at,
                        "Suppressed by cooldown"
                    );
                    outcome.suppressed.push(opp);
                }
                _ => fresh.push(opp),
            }
        }

        fresh.sort_by(compare_opportunities);
        if fresh.len() > self.config.max_report {
            outcome.truncated = fresh.split_off(self.config.max_report);
        }

        outcome.seen = fresh
            .iter()
            .map(|opp| SeenMarket::new(opp.market().id.clone(), opp.decision(), now))
            .collect();
        outcome.reported = fresh;

        info!(
            reported = outcome.reported.len(),
            suppressed = outcome.suppressed.len(),
            truncated = outcome.truncated.len(),
            below_threshold = outcome.below_threshold,
            abstained = outcome.abstained,
            "Ranking complete"
        );
        Ok(outcome)
    }
}

/// Score desc, then edge desc, then liquidity desc, then id asc.
fn compare_opportunities(a: &Opportunity, b: &Opportunity) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| b.edge().total_cmp(&a.edge()))
        .then_with(|| b.market().liquidity.total_cmp(&a.market().liquidity))
        .then_with(|| a.market().id.cmp(&b.market().id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemorySeenStore;
    use crate::domain::id::MarketId;
    use crate::domain::judgment::{Confidence, Decision};

    fn pair(id: &str, implied: f64, estimate: f64, liquidity: f64) -> (MarketRecord, Judgment) {
        let decision = if estimate > implied { Decision::Yes } else { Decision::No };
        (
            MarketRecord::new(id, format!("Market {id}"), liquidity, 800.0, implied),
            Judgment::try_new(decision, estimate, Confidence::High, "test").unwrap(),
        )
    }

    fn engine(min_edge: f64) -> RankingEngine {
        RankingEngine::new(RankingConfig {
            min_edge,
            ..RankingConfig::default()
        })
    }

    /// Rank, then record the cooldown entries the way a successful run does.
    async fn rank_and_record(
        engine: &RankingEngine,
        pairs: Vec<(MarketRecord, Judgment)>,
        store: &MemorySeenStore,
        now: DateTime<Utc>,
    ) -> RankOutcome {
        let outcome = engine.rank(pairs, store, now).await.unwrap();
        for entry in &outcome.seen {
            store.upsert(entry).await.unwrap();
        }
        outcome
    }

    #[tokio::test]
    async fn edge_threshold_decides_materialisation() {
        let store = MemorySeenStore::new();
        let now = Utc::now();

        let outcome = engine(0.05).rank(vec![pair("b", 0.55, 0.70, 2000.0)], &store, now).await.unwrap();
        assert_eq!(outcome.reported.len(), 1);
        assert!((outcome.reported[0].edge() - 0.15).abs() < 1e-9);

        let store = MemorySeenStore::new();
        let outcome = engine(0.20).rank(vec![pair("b", 0.55, 0.70, 2000.0)], &store, now).await.unwrap();
        assert!(outcome.reported.is_empty());
        assert_eq!(outcome.below_threshold, 1);
    }

    #[tokio::test]
    async fn abstentions_are_dropped() {
        let store = MemorySeenStore::new();
        let market = MarketRecord::new("a", "t", 2000.0, 800.0, 0.5);
        let outcome = engine(0.05)
            .rank(vec![(market, Judgment::abstain("unsure"))], &store, Utc::now())
            .await
            .unwrap();
        assert!(outcome.reported.is_empty());
        assert_eq!(outcome.abstained, 1);
    }

    #[tokio::test]
    async fn recent_same_decision_is_suppressed_without_touching_timestamp() {
        let store = MemorySeenStore::new();
        let first = Utc::now();
        let engine = engine(0.05);

        rank_and_record(&engine, vec![pair("m", 0.55, 0.70, 2000.0)], &store, first).await;
        let later = first + Duration::hours(2);
        let outcome =
            rank_and_record(&engine, vec![pair("m", 0.55, 0.70, 2000.0)], &store, later).await;

        assert!(outcome.reported.is_empty());
        assert_eq!(outcome.suppressed.len(), 1);
        assert!(outcome.seen.is_empty());
        let seen = store.get(&MarketId::new("m"), Decision::Yes).await.unwrap().unwrap();
        assert_eq!(seen.reported_at, first);
    }

    #[tokio::test]
    async fn changed_decision_is_not_suppressed() {
        let store = MemorySeenStore::new();
        let now = Utc::now();
        let engine = engine(0.05);

        rank_and_record(&engine, vec![pair("m", 0.55, 0.70, 2000.0)], &store, now).await;
        let outcome = rank_and_record(
            &engine,
            vec![pair("m", 0.55, 0.40, 2000.0)],
            &store,
            now + Duration::hours(1),
        )
        .await;
        assert_eq!(outcome.reported.len(), 1);
        assert_eq!(outcome.reported[0].decision(), Decision::No);
    }

    #[tokio::test]
    async fn only_reported_opportunities_are_marked_seen() {
        let store = MemorySeenStore::new();
        let engine = RankingEngine::new(RankingConfig {
            max_report: 1,
            ..RankingConfig::default()
        });
        let outcome = engine
            .rank(
                vec![pair("small", 0.50, 0.56, 2000.0), pair("big", 0.50, 0.75, 2000.0)],
                &store,
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.reported.len(), 1);
        assert_eq!(outcome.reported[0].market().id.as_str(), "big");
        assert_eq!(outcome.truncated.len(), 1);
        assert_eq!(outcome.seen.len(), 1);
        assert_eq!(outcome.seen[0].market_id.as_str(), "big");
        assert_eq!(outcome.seen[0].decision, Decision::Yes);
    }

    #[tokio::test]
    async fn ranking_leaves_the_store_untouched() {
        let store = MemorySeenStore::new();
        let outcome = engine(0.05)
            .rank(vec![pair("m", 0.55, 0.70, 2000.0)], &store, Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.reported.len(), 1);
        assert_eq!(outcome.seen.len(), 1);
        assert!(store.is_empty());
        assert!(store.get(&MarketId::new("m"), Decision::Yes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ordering_ignores_input_order() {
        let pairs = vec![
            pair("c", 0.50, 0.70, 2000.0),
            pair("a", 0.50, 0.70, 2000.0),
            pair("b", 0.50, 0.70, 50_000.0),
            pair("d", 0.50, 0.62, 2000.0),
        ];
        let mut reversed = pairs.clone();
        reversed.reverse();
        let now = Utc::now();

        let ids = |outcome: RankOutcome| {
            outcome
                .reported
                .iter()
                .map(|o| o.market().id.as_str().to_string())
                .collect::<Vec<_>>()
        };
        let forward = ids(engine(0.05).rank(pairs, &MemorySeenStore::new(), now).await.unwrap());
        let backward = ids(engine(0.05).rank(reversed, &MemorySeenStore::new(), now).await.unwrap());

        assert_eq!(forward, backward);
        assert_eq!(forward, vec!["b", "a", "c", "d"]);
    }
}
