//! Pipeline composition root.
//!
//! [`assemble`] wires stage configuration around a set of collaborators;
//! [`build_pipeline`] picks the live or dry-run collaborators and calls it.

use std::sync::Arc;

use tracing::info;

use super::{llm, notifier, persistence};
use crate::adapter::outbound::inference::{LlmJudge, LlmResearcher};
use crate::adapter::outbound::memory::{MemoryPredictionLog, MemoryReportStore, MemorySeenStore};
use crate::adapter::outbound::polymarket::PolymarketClient;
use crate::application::{
    CallGuard, JudgmentInvoker, MarketFilter, Pipeline, RankingEngine, RateLimiter,
    ResearchInvoker, WorthinessScorer,
};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{
    Judge, MarketProvider, PredictionLog, ReportStore, Researcher, SeenMarketStore, SinkRegistry,
};

/// How a run treats state and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Durable stores and configured sinks.
    Live,
    /// In-memory stores and no sinks. Nothing outlives the process.
    DryRun,
}

/// External collaborators of one pipeline.
pub struct Collaborators {
    pub provider: Arc<dyn MarketProvider>,
    pub researcher: Arc<dyn Researcher>,
    pub judge: Arc<dyn Judge>,
    pub seen: Arc<dyn SeenMarketStore>,
    pub reports: Arc<dyn ReportStore>,
    pub predictions: Arc<dyn PredictionLog>,
    pub sinks: SinkRegistry,
}

/// Wire a pipeline from configuration and collaborators.
///
/// Research and judgment share one rate limiter, so the configured request
/// budget covers both stages.
///
/// # Errors
///
/// Returns an error if the builder rejects the assembly.
pub fn assemble(config: &Config, collaborators: Collaborators) -> Result<Pipeline> {
    let limiter = RateLimiter::per_minute(config.invoker.requests_per_minute);
    let guard = CallGuard::new(
        config.invoker.retry_policy(),
        limiter,
        config.invoker.call_timeout(),
    );

    Pipeline::builder()
        .provider(collaborators.provider)
        .filter(MarketFilter::new(config.filter.clone()))
        .scorer(WorthinessScorer::new(config.worthiness.clone()))
        .research(ResearchInvoker::new(collaborators.researcher, guard.clone()))
        .judgment(JudgmentInvoker::new(collaborators.judge, guard, &config.judgment))
        .ranking(RankingEngine::new(config.ranking.clone()))
        .seen_store(collaborators.seen)
        .report_store(collaborators.reports)
        .prediction_log(collaborators.predictions)
        .sinks(collaborators.sinks)
        .settings(config.pipeline_settings())
        .build()
}

/// Build the production pipeline.
///
/// # Errors
///
/// Fails when an API key is missing or, in live mode, when the database
/// cannot be opened.
pub fn build_pipeline(config: &Config, mode: RunMode) -> Result<Pipeline> {
    let provider: Arc<dyn MarketProvider> = Arc::new(PolymarketClient::from_config(&config.scan));
    let researcher: Arc<dyn Researcher> =
        Arc::new(LlmResearcher::new(llm::build_research_llm(config)?));
    let judge: Arc<dyn Judge> = Arc::new(LlmJudge::new(llm::build_judge_llm(config)?));

    let (stores, sinks) = match mode {
        RunMode::Live => (
            persistence::build_persistence(config)?,
            notifier::build_sinks(config),
        ),
        RunMode::DryRun => (
            persistence::Persistence {
                seen: Arc::new(MemorySeenStore::new()),
                reports: Arc::new(MemoryReportStore::new()),
                predictions: Arc::new(MemoryPredictionLog::new()),
            },
            SinkRegistry::new(),
        ),
    };

    info!(?mode, "Pipeline assembled");
    assemble(
        config,
        Collaborators {
            provider,
            researcher,
            judge,
            seen: stores.seen,
            reports: stores.reports,
            predictions: stores.predictions,
            sinks,
        },
    )
}
