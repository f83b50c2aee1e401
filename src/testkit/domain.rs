//! Builders for domain values used across tests.
//!
//! [`market`] produces a market that clears the default filter and
//! worthiness thresholds at any price strictly between 0.02 and 0.98, so
//! pipeline tests only need to vary the price.

use chrono::{Duration, Utc};

use crate::domain::id::{MarketId, RunId};
use crate::domain::judgment::{Confidence, Decision, Judgment};
use crate::domain::market::MarketRecord;
use crate::domain::report::{RunReport, RunStats};
use crate::domain::research::ResearchFinding;

/// Create a [`MarketId`] from a string.
pub fn market_id(id: &str) -> MarketId {
    MarketId::from(id)
}

/// A liquid, information-driven market resolving in two weeks.
pub fn market(id: &str, implied_probability: f64) -> MarketRecord {
    MarketRecord::new(
        id,
        format!("Will the Senate pass bill {id}?"),
        20_000.0,
        3_000.0,
        implied_probability,
    )
    .with_description("Resolves per official announcement from Congress.")
    .with_tags(["Politics"])
    .with_end_date(Utc::now() + Duration::days(14))
}

/// Research notes for `id` without structured evidence.
pub fn finding(id: &str, text: &str) -> ResearchFinding {
    ResearchFinding {
        market_id: MarketId::from(id),
        query: format!("question for {id}"),
        text: text.to_string(),
        evidence: None,
        provider: "test".to_string(),
        gathered_at: Utc::now(),
    }
}

/// A valid judgment; panics on an out-of-range estimate.
pub fn judgment(decision: Decision, estimate: f64, confidence: Confidence) -> Judgment {
    Judgment::try_new(decision, estimate, confidence, "test rationale")
        .unwrap_or_else(|e| panic!("invalid test judgment: {e}"))
}

/// Judge response text carrying `estimate` and `confidence`; the decision
/// is left for the parser to derive.
pub fn judgment_json(estimate: f64, confidence: &str) -> String {
    format!(
        r#"{{"estimated_probability": {estimate}, "confidence_level": "{confidence}", "reasoning_summary": "scripted view", "key_risks": ["scripted risk"]}}"#
    )
}

/// An empty run report stamped now.
pub fn empty_report() -> RunReport {
    RunReport {
        run_id: RunId::new(),
        run_at: Utc::now(),
        stats: RunStats::default(),
        opportunities: Vec::new(),
    }
}
