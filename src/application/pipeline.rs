//! One pass of the opportunity evaluation pipeline.
//!
//! Stages run in strict sequence: fetch, filter, worthiness, research,
//! judgment, ranking, report. Research and judgment fan out over markets up
//! to the configured parallelism, and every outstanding call is cut off at
//! the run deadline. Results are collected by market id and put back into
//! worthiness order, so ranking never sees completion order.
//!
//! Durable writes follow the report: the report is persisted first, then
//! the judgment history and the cooldown entries, and only then are sinks
//! notified. A run whose report cannot be stored leaves no cooldown behind.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn};

use super::filter::MarketFilter;
use super::history::prediction_records;
use super::judgment::JudgmentInvoker;
use super::ranking::RankingEngine;
use super::report::ReportAssembler;
use super::research::ResearchInvoker;
use super::worthiness::{ScoredMarket, WorthinessScorer};
use crate::domain::id::{MarketId, RunId};
use crate::domain::judgment::Judgment;
use crate::domain::market::MarketRecord;
use crate::domain::report::{RunReport, RunStats};
use crate::domain::research::ResearchFinding;
use crate::error::{ConfigError, Error, Result};
use crate::port::{
    Delivery, MarketProvider, PersistedReport, PredictionLog, ReportStore, SeenMarketStore,
    SinkRegistry,
};

/// Limits that shape a run but belong to no single stage.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Markets requested from the provider.
    pub max_markets: usize,
    /// Researched markets sent for judgment, best worthiness first.
    pub max_judge: usize,
    /// Concurrent collaborator calls per stage.
    pub parallelism: usize,
    /// Budget for all research and judgment calls of one run.
    pub run_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_markets: 100,
            max_judge: 5,
            parallelism: 4,
            run_timeout: Duration::from_secs(600),
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub persisted: PersistedReport,
    /// `None` when nothing was worth notifying.
    pub delivery: Option<Delivery>,
}

/// The evaluation pipeline with all of its collaborators.
pub struct Pipeline {
    provider: Arc<dyn MarketProvider>,
    filter: MarketFilter,
    scorer: WorthinessScorer,
    research: ResearchInvoker,
    judgment: JudgmentInvoker,
    ranking: RankingEngine,
    seen: Arc<dyn SeenMarketStore>,
    reports: Arc<dyn ReportStore>,
    predictions: Option<Arc<dyn PredictionLog>>,
    sinks: Arc<SinkRegistry>,
    assembler: ReportAssembler,
    settings: PipelineSettings,
}

impl Pipeline {
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the pipeline once, now.
    ///
    /// # Errors
    ///
    /// Fails only when the market provider, the seen-market store or the
    /// report store fails. Per-market collaborator failures shrink the
    /// result instead, and a failing judgment history is only logged.
    pub async fn run(&self) -> Result<RunOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Run the pipeline as of `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunOutcome> {
        let run_id = RunId::new();
        let deadline = Instant::now() + self.settings.run_timeout;
        let mut stats = RunStats::default();
        info!(run_id = %run_id, provider = self.provider.name(), "Pipeline run started");

        let markets = self
            .provider
            .list_markets(self.settings.max_markets)
            .await
            .map_err(|e| {
                error!(run_id = %run_id, error = %e, "Market provider failed, aborting run");
                match e {
                    Error::Provider(message) => Error::Provider(message),
                    other => Error::Provider(other.to_string()),
                }
            })?;
        let markets = dedupe(markets);
        stats.scanned = markets.len();

        let filtered = self.filter.filter(&markets);
        stats.filtered = filtered.len();

        let selected = self.scorer.select(&filtered, now);
        stats.worthy = selected.len();
        info!(
            scanned = stats.scanned,
            filtered = stats.filtered,
            selected = stats.worthy,
            "Markets selected for research"
        );

        let findings = self.research_all(&selected, deadline, &mut stats).await;
        stats.researched = findings.len();

        let to_judge: Vec<_> = findings.into_iter().take(self.settings.max_judge).collect();
        let judged = self.judge_all(&to_judge, deadline, &mut stats).await;
        stats.judged = judged.len();

        let mut outcome = self.ranking.rank(judged.clone(), self.seen.as_ref(), now).await?;
        stats.suppressed = outcome.suppressed.len();
        let predictions = prediction_records(&run_id, &judged, &to_judge, &outcome, now);
        let seen = std::mem::take(&mut outcome.seen);

        let (report, payload) = self
            .assembler
            .assemble(run_id, now, stats, outcome.reported);

        let persisted = self.reports.persist(&report).await.map_err(|e| {
            error!(run_id = %report.run_id, error = %e, "Failed to persist report");
            e
        })?;

        if let Some(log) = &self.predictions {
            if let Err(e) = log.record(&predictions).await {
                warn!(run_id = %report.run_id, error = %e, "Failed to record judgment history");
            }
        }

        for entry in &seen {
            self.seen.upsert(entry).await.map_err(|e| {
                error!(run_id = %report.run_id, error = %e, "Failed to record cooldown");
                e
            })?;
        }

        let delivery = match &payload {
            Some(payload) => Some(self.sinks.send_all(payload).await),
            None => {
                info!(run_id = %report.run_id, "No opportunities, skipping notification");
                None
            }
        };

        info!(
            run_id = %report.run_id,
            opportunities = report.opportunities.len(),
            suppressed = report.stats.suppressed,
            timed_out = report.stats.timed_out,
            report = %persisted.location,
            "Pipeline run complete"
        );
        Ok(RunOutcome {
            report,
            persisted,
            delivery,
        })
    }

    async fn research_all(
        &self,
        selected: &[ScoredMarket],
        deadline: Instant,
        stats: &mut RunStats,
    ) -> Vec<(MarketRecord, ResearchFinding)> {
        let outcomes = fan_out(selected, scored_id, self.settings.parallelism, deadline, |s| {
            self.research.research(&s.market)
        })
        .await;

        let mut findings = Vec::with_capacity(selected.len());
        for (scored, outcome) in selected.iter().zip(outcomes) {
            match outcome {
                CallOutcome::Done(finding) => findings.push((scored.market.clone(), finding)),
                CallOutcome::Failed => stats.research_failures += 1,
                CallOutcome::TimedOut => {
                    warn!(market_id = %scored.market.id, "Research cut off by run deadline");
                    stats.timed_out = true;
                }
            }
        }
        findings
    }

    async fn judge_all(
        &self,
        researched: &[(MarketRecord, ResearchFinding)],
        deadline: Instant,
        stats: &mut RunStats,
    ) -> Vec<(MarketRecord, Judgment)> {
        let outcomes = fan_out(researched, researched_id, self.settings.parallelism, deadline, |(m, f)| {
            self.judgment.judge(m, f)
        })
        .await;

        let mut judged = Vec::with_capacity(researched.len());
        for ((market, _), outcome) in researched.iter().zip(outcomes) {
            match outcome {
                CallOutcome::Done(judgment) => judged.push((market.clone(), judgment)),
                CallOutcome::Failed => stats.judgment_failures += 1,
                CallOutcome::TimedOut => {
                    warn!(market_id = %market.id, "Judgment cut off by run deadline");
                    stats.timed_out = true;
                }
            }
        }
        judged
    }
}

enum CallOutcome<R> {
    Done(R),
    Failed,
    TimedOut,
}

fn scored_id(scored: &ScoredMarket) -> &MarketId {
    &scored.market.id
}

fn researched_id(pair: &(MarketRecord, ResearchFinding)) -> &MarketId {
    &pair.0.id
}

/// Run `call` for every item with at most `parallelism` in flight, and
/// return the outcomes in item order.
///
/// Calls not finished by `deadline` are dropped; calls not yet started by
/// then are never made.
async fn fan_out<'a, T, R, F, Fut>(
    items: &'a [T],
    id: fn(&T) -> &MarketId,
    parallelism: usize,
    deadline: Instant,
    call: F,
) -> Vec<CallOutcome<R>>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let call = &call;
    let mut by_id: HashMap<MarketId, CallOutcome<R>> = stream::iter(items)
        .map(|item| async move {
            let key = id(item).clone();
            if Instant::now() >= deadline {
                return (key, CallOutcome::TimedOut);
            }
            let outcome = match timeout_at(deadline, call(item)).await {
                Ok(Ok(value)) => CallOutcome::Done(value),
                Ok(Err(_)) => CallOutcome::Failed,
                Err(_) => CallOutcome::TimedOut,
            };
            (key, outcome)
        })
        .buffer_unordered(parallelism.max(1))
        .collect()
        .await;

    items
        .iter()
        .map(|item| by_id.remove(id(item)).unwrap_or(CallOutcome::TimedOut))
        .collect()
}

/// Keep the first listing of each market id.
fn dedupe(markets: Vec<MarketRecord>) -> Vec<MarketRecord> {
    let mut seen = HashSet::with_capacity(markets.len());
    markets
        .into_iter()
        .filter(|m| {
            let fresh = seen.insert(m.id.clone());
            if !fresh {
                warn!(market_id = %m.id, "Duplicate market listing dropped");
            }
            fresh
        })
        .collect()
}

/// Assembles a [`Pipeline`] from its collaborators.
#[derive(Default)]
pub struct PipelineBuilder {
    provider: Option<Arc<dyn MarketProvider>>,
    filter: Option<MarketFilter>,
    scorer: Option<WorthinessScorer>,
    research: Option<ResearchInvoker>,
    judgment: Option<JudgmentInvoker>,
    ranking: Option<RankingEngine>,
    seen: Option<Arc<dyn SeenMarketStore>>,
    reports: Option<Arc<dyn ReportStore>>,
    predictions: Option<Arc<dyn PredictionLog>>,
    sinks: Option<Arc<SinkRegistry>>,
    settings: PipelineSettings,
}

impl PipelineBuilder {
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn MarketProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: MarketFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn scorer(mut self, scorer: WorthinessScorer) -> Self {
        self.scorer = Some(scorer);
        self
    }

    #[must_use]
    pub fn research(mut self, research: ResearchInvoker) -> Self {
        self.research = Some(research);
        self
    }

    #[must_use]
    pub fn judgment(mut self, judgment: JudgmentInvoker) -> Self {
        self.judgment = Some(judgment);
        self
    }

    #[must_use]
    pub fn ranking(mut self, ranking: RankingEngine) -> Self {
        self.ranking = Some(ranking);
        self
    }

    #[must_use]
    pub fn seen_store(mut self, seen: Arc<dyn SeenMarketStore>) -> Self {
        self.seen = Some(seen);
        self
    }

    #[must_use]
    pub fn report_store(mut self, reports: Arc<dyn ReportStore>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Record every judged market. Without one, no history is kept.
    #[must_use]
    pub fn prediction_log(mut self, predictions: Arc<dyn PredictionLog>) -> Self {
        self.predictions = Some(predictions);
        self
    }

    #[must_use]
    pub fn sinks(mut self, sinks: SinkRegistry) -> Self {
        self.sinks = Some(Arc::new(sinks));
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the pipeline.
    ///
    /// Stages without an explicit configuration use their defaults; the
    /// collaborators are required.
    pub fn build(self) -> Result<Pipeline> {
        Ok(Pipeline {
            provider: self.provider.ok_or_else(|| missing("provider"))?,
            filter: self.filter.unwrap_or_default(),
            scorer: self.scorer.unwrap_or_default(),
            research: self.research.ok_or_else(|| missing("research"))?,
            judgment: self.judgment.ok_or_else(|| missing("judgment"))?,
            ranking: self.ranking.unwrap_or_default(),
            seen: self.seen.ok_or_else(|| missing("seen_store"))?,
            reports: self.reports.ok_or_else(|| missing("report_store"))?,
            predictions: self.predictions,
            sinks: self.sinks.unwrap_or_default(),
            assembler: ReportAssembler::new(),
            settings: self.settings,
        })
    }
}

fn missing(field: &'static str) -> Error {
    Error::Config(ConfigError::MissingField { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keeps_first_listing() {
        let markets = vec![
            MarketRecord::new("a", "first", 1.0, 1.0, 0.5),
            MarketRecord::new("b", "other", 1.0, 1.0, 0.5),
            MarketRecord::new("a", "second", 1.0, 1.0, 0.5),
        ];
        let kept = dedupe(markets);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].title, "first");
    }

    #[tokio::test]
    async fn fan_out_restores_item_order() {
        let items: Vec<(MarketRecord, u64)> = vec![
            (MarketRecord::new("slow", "t", 1.0, 1.0, 0.5), 30),
            (MarketRecord::new("fast", "t", 1.0, 1.0, 0.5), 1),
        ];
        fn id(item: &(MarketRecord, u64)) -> &MarketId {
            &item.0.id
        }
        let deadline = Instant::now() + Duration::from_secs(5);
        let outcomes = fan_out(&items, id, 2, deadline, |(m, delay)| async move {
            tokio::time::sleep(Duration::from_millis(*delay)).await;
            Ok(m.id.as_str().to_string())
        })
        .await;

        let ids: Vec<_> = outcomes
            .into_iter()
            .map(|o| match o {
                CallOutcome::Done(id) => id,
                _ => panic!("expected completion"),
            })
            .collect();
        assert_eq!(ids, vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn fan_out_cuts_off_at_deadline() {
        let items = vec![(MarketRecord::new("m", "t", 1.0, 1.0, 0.5), 0u64)];
        fn id(item: &(MarketRecord, u64)) -> &MarketId {
            &item.0.id
        }
        let deadline = Instant::now() + Duration::from_millis(10);
        let outcomes = fan_out(&items, id, 1, deadline, |_| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(outcomes[0], CallOutcome::TimedOut));
    }

    #[test]
    fn builder_requires_collaborators() {
        assert!(matches!(
            Pipeline::builder().build(),
            Err(Error::Config(ConfigError::MissingField { field: "provider" }))
        ));
    }
}
