//! Scripted collaborators for pipeline tests.
//!
//! - [`StaticMarketProvider`] - Fixed market list, optional delay or failure.
//! - [`ScriptedResearcher`] / [`ScriptedJudge`] - Canned responses, per
//!   market overrides, call counters.
//! - [`MockLlm`] - Fixed completion that records every prompt.
//! - [`RecordingSink`] - Keeps delivered payloads for assertions.
//! - [`TestPipeline`] - The real pipeline wired to all of the above with
//!   in-memory stores and no backoff.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::domain::judgment_json;
use crate::adapter::outbound::memory::{MemoryPredictionLog, MemoryReportStore, MemorySeenStore};
use crate::application::Pipeline;
use crate::domain::market::MarketRecord;
use crate::domain::report::NotificationPayload;
use crate::domain::research::ResearchFinding;
use crate::error::{CollaboratorError, Error, NotificationError, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::pipeline::{assemble, Collaborators};
use crate::port::{
    Judge, Llm, MarketProvider, NotificationSink, Researcher, SinkRegistry,
};

// ---------------------------------------------------------------------------
// StaticMarketProvider
// ---------------------------------------------------------------------------

/// Market provider returning a fixed list.
pub struct StaticMarketProvider {
    markets: Vec<MarketRecord>,
    delay: Option<Duration>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl StaticMarketProvider {
    pub fn new(markets: Vec<MarketRecord>) -> Self {
        Self {
            markets,
            delay: None,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A provider whose every listing fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared counter of `list_markets` calls.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl MarketProvider for StaticMarketProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn list_markets(&self, limit: usize) -> Result<Vec<MarketRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(Error::Provider("scripted provider failure".into()));
        }
        Ok(self.markets.iter().take(limit).cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// ScriptedResearcher
// ---------------------------------------------------------------------------

/// Researcher answering every question with the same notes unless the
/// question mentions a scripted fragment.
pub struct ScriptedResearcher {
    default: String,
    failures: Vec<(String, CollaboratorError)>,
    slow: Vec<(String, Duration)>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedResearcher {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            default: text.into(),
            failures: Vec::new(),
            slow: Vec::new(),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sleep `delay` on every call whose question contains `fragment`.
    pub fn slow_on(mut self, fragment: impl Into<String>, delay: Duration) -> Self {
        self.slow.push((fragment.into(), delay));
        self
    }

    /// Fail every call whose question contains `fragment`.
    pub fn fail_on(mut self, fragment: impl Into<String>, error: CollaboratorError) -> Self {
        self.failures.push((fragment.into(), error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Default for ScriptedResearcher {
    fn default() -> Self {
        Self::new("Scripted research notes.")
    }
}

#[async_trait]
impl Researcher for ScriptedResearcher {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn research(
        &self,
        _topic: &str,
        question: &str,
    ) -> std::result::Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((_, delay)) = self.slow.iter().find(|(f, _)| question.contains(f.as_str())) {
            tokio::time::sleep(*delay).await;
        }
        match self.failures.iter().find(|(f, _)| question.contains(f.as_str())) {
            Some((_, error)) => Err(error.clone()),
            None => Ok(self.default.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedJudge
// ---------------------------------------------------------------------------

/// Judge with a default response and per-market overrides.
pub struct ScriptedJudge {
    default: String,
    responses: HashMap<String, std::result::Result<String, CollaboratorError>>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedJudge {
    /// Answer `text` for any market without an override.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            default: text.into(),
            responses: HashMap::new(),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer `text` for market `id`.
    pub fn respond(mut self, id: &str, text: impl Into<String>) -> Self {
        self.responses.insert(id.to_string(), Ok(text.into()));
        self
    }

    /// Estimate `estimate` with `confidence` for market `id`.
    pub fn estimate(self, id: &str, estimate: f64, confidence: &str) -> Self {
        self.respond(id, judgment_json(estimate, confidence))
    }

    /// Fail every call for market `id`.
    pub fn fail(mut self, id: &str, error: CollaboratorError) -> Self {
        self.responses.insert(id.to_string(), Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Default for ScriptedJudge {
    fn default() -> Self {
        Self::new(judgment_json(0.8, "high"))
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn judge(
        &self,
        market: &MarketRecord,
        _findings: &ResearchFinding,
    ) -> std::result::Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .get(market.id.as_str())
            .cloned()
            .unwrap_or_else(|| Ok(self.default.clone()))
    }
}

// ---------------------------------------------------------------------------
// MockLlm
// ---------------------------------------------------------------------------

/// LLM returning a fixed completion and recording prompts.
pub struct MockLlm {
    response: std::result::Result<String, CollaboratorError>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            response: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, CollaboratorError> {
        self.prompts.lock().push(prompt.to_string());
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// Sink that keeps every payload. Clones share the same record.
#[derive(Clone, Default)]
pub struct RecordingSink {
    payloads: Arc<Mutex<Vec<NotificationPayload>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records the attempt and then fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn payloads(&self) -> Vec<NotificationPayload> {
        self.payloads.lock().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, payload: &NotificationPayload) -> std::result::Result<(), NotificationError> {
        self.payloads.lock().push(payload.clone());
        if self.fail {
            return Err(NotificationError::new("recording", "scripted sink failure"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

/// Configuration with no backoff, no rate limit and a short call timeout.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.invoker.requests_per_minute = 0;
    config.invoker.base_backoff_ms = 0;
    config.invoker.max_backoff_ms = 0;
    config.invoker.max_attempts = 2;
    config.invoker.call_timeout_secs = 5;
    config
}

/// A wired pipeline with handles on its in-memory state.
pub struct TestPipeline {
    pub pipeline: Pipeline,
    pub seen: Arc<MemorySeenStore>,
    pub reports: Arc<MemoryReportStore>,
    pub predictions: Arc<MemoryPredictionLog>,
    pub sink: RecordingSink,
}

impl TestPipeline {
    /// Wire the real pipeline from `config` around scripted collaborators.
    ///
    /// # Panics
    ///
    /// Panics if assembly fails, which only happens on a wiring bug.
    pub fn new(
        config: &Config,
        provider: impl MarketProvider + 'static,
        researcher: ScriptedResearcher,
        judge: ScriptedJudge,
    ) -> Self {
        Self::with_seen(config, provider, researcher, judge, Arc::new(MemorySeenStore::new()))
    }

    /// Same as [`TestPipeline::new`] but sharing an existing seen store, to
    /// model consecutive runs.
    pub fn with_seen(
        config: &Config,
        provider: impl MarketProvider + 'static,
        researcher: ScriptedResearcher,
        judge: ScriptedJudge,
        seen: Arc<MemorySeenStore>,
    ) -> Self {
        let reports = Arc::new(MemoryReportStore::new());
        let predictions = Arc::new(MemoryPredictionLog::new());
        let sink = RecordingSink::new();
        let mut sinks = SinkRegistry::new();
        sinks.register(Box::new(sink.clone()));

        let pipeline = assemble(
            config,
            Collaborators {
                provider: Arc::new(provider),
                researcher: Arc::new(researcher),
                judge: Arc::new(judge),
                seen: seen.clone(),
                reports: reports.clone(),
                predictions: predictions.clone(),
                sinks,
            },
        )
        .unwrap_or_else(|e| panic!("test pipeline assembly failed: {e}"));

        Self {
            pipeline,
            seen,
            reports,
            predictions,
            sink,
        }
    }
}

/// A pipeline over `provider` with default scripted research and judgment.
pub fn pipeline_with(provider: impl MarketProvider + 'static) -> Pipeline {
    TestPipeline::new(
        &fast_config(),
        provider,
        ScriptedResearcher::default(),
        ScriptedJudge::default(),
    )
    .pipeline
}
