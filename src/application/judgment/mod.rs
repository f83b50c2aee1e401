//! Judgment invoker.
//!
//! Sends a market and its research findings to the judgment collaborator and
//! maps the response onto a [`Judgment`]. Transport failures propagate as
//! [`Error::Judgment`] (the market is dropped); unusable responses do not,
//! they become low-confidence abstentions.

mod parser;

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

pub use parser::{parse_judgment, ParseError, ParsedJudgment};

use super::invoker::CallGuard;
use crate::domain::judgment::{Confidence, Judgment};
use crate::domain::market::MarketRecord;
use crate::domain::research::ResearchFinding;
use crate::error::{Error, Result};
use crate::port::Judge;

/// Judgment stage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JudgmentConfig {
    /// Most researched markets sent for judgment per run.
    #[serde(default = "default_max_judge")]
    pub max_judge: usize,
    /// Judgments below this confidence are forced to abstain.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: Confidence,
}

const fn default_max_judge() -> usize {
    5
}

const fn default_min_confidence() -> Confidence {
    Confidence::Medium
}

impl Default for JudgmentConfig {
    fn default() -> Self {
        Self {
            max_judge: default_max_judge(),
            min_confidence: default_min_confidence(),
        }
    }
}

/// Calls the judgment collaborator for individual markets.
#[derive(Clone)]
pub struct JudgmentInvoker {
    judge: Arc<dyn Judge>,
    guard: CallGuard,
    min_confidence: Confidence,
}

impl JudgmentInvoker {
    pub fn new(judge: Arc<dyn Judge>, guard: CallGuard, config: &JudgmentConfig) -> Self {
        Self {
            judge,
            guard,
            min_confidence: config.min_confidence,
        }
    }

    pub fn provider(&self) -> &'static str {
        self.judge.name()
    }

    /// Judge one market.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Judgment`] once the retry policy gives up. A response
    /// that arrives but cannot be parsed is not an error.
    pub async fn judge(&self, market: &MarketRecord, findings: &ResearchFinding) -> Result<Judgment> {
        let label = format!("judge:{}", market.id);
        let text = self
            .guard
            .call(&label, || self.judge.judge(market, findings))
            .await
            .map_err(|source| {
                warn!(market_id = %market.id, error = %source, "Judgment failed, dropping market");
                Error::Judgment {
                    market_id: market.id.clone(),
                    source,
                }
            })?;

        let parsed = parse_judgment(&text, market.implied_probability);
        if let ParsedJudgment::Unparseable { reason } = &parsed {
            info!(market_id = %market.id, reason = %reason, "Judgment unparseable, abstaining");
        }
        let judgment = parsed
            .into_judgment()
            .with_confidence_floor(self.min_confidence);

        debug!(
            market_id = %market.id,
            decision = %judgment.decision,
            estimate = judgment.estimated_probability(),
            confidence = %judgment.confidence,
            "Judgment complete"
        );
        Ok(judgment)
    }
}
