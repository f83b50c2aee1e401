//! In-memory stores for dry runs and testing.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::prediction::PredictionRecord;
use crate::domain::{id::MarketId, judgment::Decision, report::RunReport, seen::SeenMarket};
use crate::error::Result;
use crate::port::{PersistedReport, PredictionLog, PredictionReader, ReportStore, SeenMarketStore};

/// In-memory [`SeenMarketStore`]. State lives as long as the value.
#[derive(Debug, Default)]
pub struct MemorySeenStore {
    entries: RwLock<HashMap<(MarketId, Decision), SeenMarket>>,
}

impl MemorySeenStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl SeenMarketStore for MemorySeenStore {
    async fn get(&self, market_id: &MarketId, decision: Decision) -> Result<Option<SeenMarket>> {
        Ok(self
            .entries
            .read()
            .get(&(market_id.clone(), decision))
            .cloned())
    }

    async fn upsert(&self, seen: &SeenMarket) -> Result<()> {
        self.entries
            .write()
            .insert((seen.market_id.clone(), seen.decision), seen.clone());
        Ok(())
    }
}

/// In-memory [`ReportStore`] that keeps every persisted report.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: RwLock<Vec<RunReport>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports persisted so far, oldest first.
    pub fn reports(&self) -> Vec<RunReport> {
        self.reports.read().clone()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn persist(&self, report: &RunReport) -> Result<PersistedReport> {
        let mut reports = self.reports.write();
        reports.push(report.clone());
        Ok(PersistedReport {
            location: format!("memory:{}", reports.len() - 1),
        })
    }
}

/// In-memory [`PredictionLog`].
#[derive(Debug, Default)]
pub struct MemoryPredictionLog {
    records: RwLock<Vec<PredictionRecord>>,
}

impl MemoryPredictionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub fn predictions(&self) -> Vec<PredictionRecord> {
        self.records.read().clone()
    }
}

#[async_trait]
impl PredictionLog for MemoryPredictionLog {
    async fn record(&self, predictions: &[PredictionRecord]) -> Result<()> {
        self.records.write().extend_from_slice(predictions);
        Ok(())
    }
}

impl PredictionReader for MemoryPredictionLog {
    fn recent_predictions(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        Ok(self.records.read().iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::id::RunId;
    use crate::domain::report::RunStats;

    #[tokio::test]
    async fn seen_entries_are_keyed_by_market_and_decision() {
        let store = MemorySeenStore::new();
        let id = MarketId::new("m");
        store.upsert(&SeenMarket::new(id.clone(), Decision::Yes, Utc::now())).await.unwrap();

        assert!(store.get(&id, Decision::Yes).await.unwrap().is_some());
        assert!(store.get(&id, Decision::No).await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn reports_are_appended() {
        let store = MemoryReportStore::new();
        for _ in 0..2 {
            let report = RunReport {
                run_id: RunId::new(),
                run_at: Utc::now(),
                stats: RunStats::default(),
                opportunities: vec![],
            };
            store.persist(&report).await.unwrap();
        }
        let reports = store.reports();
        assert_eq!(reports.len(), 2);
        assert_ne!(reports[0].run_id, reports[1].run_id);
    }

    #[tokio::test]
    async fn predictions_read_back_newest_first() {
        use crate::domain::judgment::Judgment;
        use crate::domain::market::MarketRecord;
        use crate::domain::prediction::PredictionOutcome;

        let log = MemoryPredictionLog::new();
        let run = RunId::new();
        let records: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|id| {
                let market = MarketRecord::new(*id, "t", 5_000.0, 900.0, 0.5);
                PredictionRecord::new(
                    run.clone(),
                    &market,
                    &Judgment::abstain("thin"),
                    PredictionOutcome::Abstained,
                    Utc::now(),
                )
            })
            .collect();
        log.record(&records).await.unwrap();

        let recent = log.recent_predictions(2).unwrap();
        let ids: Vec<_> = recent.iter().map(|r| r.market_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert_eq!(log.predictions().len(), 3);
    }
}
