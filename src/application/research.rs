//! Research invoker.
//!
//! Turns one market into a [`ResearchFinding`] by calling the research
//! collaborator under the shared call guard. A failure here only drops the
//! market; the batch carries on.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::extract::extract_json;
use super::invoker::CallGuard;
use crate::domain::market::MarketRecord;
use crate::domain::research::{Evidence, ResearchFinding};
use crate::error::{Error, Result};
use crate::port::Researcher;

/// Topic used when a market carries no tags.
const DEFAULT_TOPIC: &str = "general";

/// Calls the research collaborator for individual markets.
#[derive(Clone)]
pub struct ResearchInvoker {
    researcher: Arc<dyn Researcher>,
    guard: CallGuard,
}

impl ResearchInvoker {
    pub fn new(researcher: Arc<dyn Researcher>, guard: CallGuard) -> Self {
        Self { researcher, guard }
    }

    pub fn provider(&self) -> &'static str {
        self.researcher.name()
    }

    /// Research one market.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Research`] once the retry policy gives up.
    pub async fn research(&self, market: &MarketRecord) -> Result<ResearchFinding> {
        let topic = research_topic(market);
        let question = research_question(market);
        let label = format!("research:{}", market.id);

        let text = self
            .guard
            .call(&label, || self.researcher.research(topic, &question))
            .await
            .map_err(|source| {
                warn!(market_id = %market.id, error = %source, "Research failed, dropping market");
                Error::Research {
                    market_id: market.id.clone(),
                    source,
                }
            })?;

        let evidence = parse_evidence(&text);
        debug!(
            market_id = %market.id,
            chars = text.len(),
            evidence_items = evidence.as_ref().map_or(0, Evidence::item_count),
            "Research complete"
        );

        Ok(ResearchFinding {
            market_id: market.id.clone(),
            query: question,
            text,
            evidence,
            provider: self.researcher.name().to_string(),
            gathered_at: Utc::now(),
        })
    }
}

fn research_topic(market: &MarketRecord) -> &str {
    market
        .tags
        .first()
        .map_or(DEFAULT_TOPIC, String::as_str)
}

fn research_question(market: &MarketRecord) -> String {
    if market.description.trim().is_empty() {
        market.title.clone()
    } else {
        format!("{}\n\n{}", market.title, market.description.trim())
    }
}

/// Parse the structured evidence block, if the response carries one.
fn parse_evidence(text: &str) -> Option<Evidence> {
    let json = extract_json(text)?;
    serde_json::from_str::<Evidence>(json)
        .ok()
        .map(Evidence::capped)
        .filter(|e| e.item_count() > 0)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::application::rate_limit::RateLimiter;
    use crate::application::retry::RetryPolicy;
    use crate::error::CollaboratorError;

    struct FlakyResearcher {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Researcher for FlakyResearcher {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn research(&self, topic: &str, _question: &str) -> std::result::Result<String, CollaboratorError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(CollaboratorError::RateLimited)
            } else {
                Ok(format!(
                    "topic={topic}\n```json\n{{\"evidence_yes\": [\"poll lead\"], \"source_quality\": \"high\"}}\n```"
                ))
            }
        }
    }

    fn invoker(failures: u32) -> (ResearchInvoker, Arc<FlakyResearcher>) {
        let researcher = Arc::new(FlakyResearcher {
            failures,
            calls: AtomicU32::new(0),
        });
        let policy = RetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
            jitter: false,
            ..RetryPolicy::default()
        };
        let guard = CallGuard::new(policy, RateLimiter::unlimited(), Duration::from_secs(1));
        (ResearchInvoker::new(researcher.clone(), guard), researcher)
    }

    fn market() -> MarketRecord {
        MarketRecord::new("m-1", "Will the bill pass?", 5000.0, 900.0, 0.4)
            .with_description("Resolves YES if signed into law.")
            .with_tags(["politics"])
    }

    #[tokio::test]
    async fn success_builds_finding_with_evidence() {
        let (invoker, _) = invoker(0);
        let finding = invoker.research(&market()).await.unwrap();

        assert_eq!(finding.market_id.as_str(), "m-1");
        assert!(finding.text.starts_with("topic=politics"));
        assert!(finding.query.contains("signed into law"));
        let evidence = finding.evidence.unwrap();
        assert_eq!(evidence.evidence_yes, vec!["poll lead".to_string()]);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let (invoker, researcher) = invoker(2);
        assert!(invoker.research(&market()).await.is_ok());
        assert_eq!(researcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_name_the_market() {
        let (invoker, _) = invoker(10);
        let err = invoker.research(&market()).await.unwrap_err();
        assert!(matches!(err, Error::Research { ref market_id, .. } if market_id.as_str() == "m-1"));
    }

    #[test]
    fn untagged_market_uses_default_topic() {
        let market = MarketRecord::new("m", "t", 1.0, 1.0, 0.5);
        assert_eq!(research_topic(&market), DEFAULT_TOPIC);
        assert_eq!(research_question(&market), "t");
    }

    #[test]
    fn prose_without_evidence_is_kept_as_text_only() {
        assert_eq!(parse_evidence("Nothing structured here."), None);
        assert_eq!(parse_evidence("{\"unrelated\": true}"), None);
    }
}
