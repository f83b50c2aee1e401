//! Tests for factory functions.
//!
//! Verifies that factory functions correctly build infrastructure components
//! based on configuration settings.

use std::sync::Mutex;

use crate::error::{ConfigError, Error};
use crate::infrastructure::config::llm::LlmProvider;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::{llm, notifier, persistence};

/// Serializes tests that modify API key variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with `var` set to `value` (or unset), restoring it afterwards.
fn with_env<T>(var: &str, value: Option<&str>, f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::var(var).ok();
    match value {
        Some(v) => std::env::set_var(var, v),
        None => std::env::remove_var(var),
    }
    let result = f();
    match original {
        Some(v) => std::env::set_var(var, v),
        None => std::env::remove_var(var),
    }
    result
}

// ---------------------------------------------------------------------------
// LLM Factory Tests
// ---------------------------------------------------------------------------

mod llm_factory {
    use super::*;

    #[test]
    fn judge_requires_anthropic_key() {
        let config = Config::default();
        let result = with_env("ANTHROPIC_API_KEY", None, || llm::build_judge_llm(&config));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField { field: "ANTHROPIC_API_KEY" }))
        ));
    }

    #[test]
    fn judge_uses_anthropic_by_default() {
        let config = Config::default();
        let client = with_env("ANTHROPIC_API_KEY", Some("test-key"), || {
            llm::build_judge_llm(&config)
        })
        .unwrap();
        assert_eq!(client.name(), "anthropic");
    }

    #[test]
    fn judge_uses_openai_when_selected() {
        let mut config = Config::default();
        config.llm.provider = LlmProvider::OpenAi;

        let missing = with_env(llm::OPENAI_KEY_VAR, None, || llm::build_judge_llm(&config));
        assert!(missing.is_err());

        let client = with_env(llm::OPENAI_KEY_VAR, Some("test-key"), || {
            llm::build_judge_llm(&config)
        })
        .unwrap();
        assert_eq!(client.name(), "openai");
    }

    #[test]
    fn research_goes_to_perplexity() {
        let config = Config::default();

        let missing = with_env(llm::PERPLEXITY_KEY_VAR, None, || llm::build_research_llm(&config));
        assert!(matches!(
            missing,
            Err(Error::Config(ConfigError::MissingField { field: "PERPLEXITY_API_KEY" }))
        ));

        let client = with_env(llm::PERPLEXITY_KEY_VAR, Some("test-key"), || {
            llm::build_research_llm(&config)
        })
        .unwrap();
        assert_eq!(client.name(), "perplexity");
    }
}

// ---------------------------------------------------------------------------
// Notifier Factory Tests
// ---------------------------------------------------------------------------

mod notifier_factory {
    use super::*;

    #[test]
    fn log_sink_is_always_registered() {
        let registry = notifier::build_sinks(&Config::default());
        assert_eq!(registry.len(), 1);
    }
}

// ---------------------------------------------------------------------------
// Persistence Factory Tests
// ---------------------------------------------------------------------------

mod persistence_factory {
    use super::*;
    use crate::domain::judgment::Decision;
    use crate::domain::seen::SeenMarket;
    use crate::domain::id::RunId;
    use crate::domain::judgment::Judgment;
    use crate::domain::prediction::{PredictionOutcome, PredictionRecord};
    use crate::port::{PredictionLog, PredictionReader, ReportStore, RunLogReader, SeenMarketStore};
    use crate::testkit::domain::{empty_report, market, market_id};

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.database = dir.join("nested/edgescout.db").display().to_string();
        config.report.dir = dir.join("reports").display().to_string();
        config
    }

    #[tokio::test]
    async fn reports_go_to_file_and_run_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let stores = persistence::build_persistence(&config).unwrap();
        let report = empty_report();
        let persisted = stores.reports.persist(&report).await.unwrap();

        assert!(persisted.location.contains("opportunity_report_"));
        assert!(std::path::Path::new(&persisted.location).exists());

        let runs = persistence::build_run_log(&config).unwrap().recent_runs(10).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].run_id, report.run_id.as_str());
    }

    #[tokio::test]
    async fn seen_markets_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let id = market_id("m1");

        {
            let stores = persistence::build_persistence(&config).unwrap();
            stores
                .seen
                .upsert(&SeenMarket::new(id.clone(), Decision::Yes, chrono::Utc::now()))
                .await
                .unwrap();
        }

        let stores = persistence::build_persistence(&config).unwrap();
        assert!(stores.seen.get(&id, Decision::Yes).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn judgment_history_is_readable_after_a_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let record = PredictionRecord::new(
            RunId::new(),
            &market("m1", 0.5),
            &Judgment::abstain("thin"),
            PredictionOutcome::Abstained,
            chrono::Utc::now(),
        );

        persistence::build_persistence(&config)
            .unwrap()
            .predictions
            .record(std::slice::from_ref(&record))
            .await
            .unwrap();

        let history = persistence::build_prediction_log(&config)
            .unwrap()
            .recent_predictions(5)
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].market_id, record.market_id);
        assert_eq!(history[0].outcome, PredictionOutcome::Abstained);
    }
}

// ---------------------------------------------------------------------------
// Pipeline Factory Tests
// ---------------------------------------------------------------------------

mod pipeline_factory {
    use crate::testkit::collaborator::{
        fast_config, ScriptedJudge, ScriptedResearcher, StaticMarketProvider, TestPipeline,
    };
    use crate::testkit::domain::market;

    #[tokio::test]
    async fn assembled_pipeline_honours_config_limits() {
        let mut config = fast_config();
        config.ranking.max_report = 1;
        let provider = StaticMarketProvider::new(vec![market("a", 0.3), market("b", 0.4)]);
        let judge = ScriptedJudge::new("{}").estimate("a", 0.6, "high").estimate("b", 0.7, "high");

        let test = TestPipeline::new(&config, provider, ScriptedResearcher::default(), judge);
        let outcome = test.pipeline.run().await.unwrap();

        assert_eq!(test.pipeline.settings().max_judge, config.judgment.max_judge);
        assert_eq!(outcome.report.opportunities.len(), 1);
        assert_eq!(test.seen.len(), 1);
    }
}
