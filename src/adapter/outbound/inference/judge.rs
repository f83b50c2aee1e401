//! Probability-estimation collaborator.

use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::domain::market::MarketRecord;
use crate::domain::research::{Evidence, ResearchFinding};
use crate::error::CollaboratorError;
use crate::port::{Judge, Llm};

/// Evidence items shown to the judge per list.
const PROMPT_EVIDENCE_ITEMS: usize = 10;
/// Raw research text shown when no structured evidence was parsed.
const PROMPT_RAW_CHARS: usize = 4000;

/// Judge that asks an LLM for a conservative probability estimate.
pub struct LlmJudge {
    llm: Arc<dyn Llm>,
}

impl LlmJudge {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    fn build_prompt(market: &MarketRecord, findings: &ResearchFinding) -> String {
        let resolution = market
            .days_to_resolution(Utc::now())
            .map_or_else(|| "unknown".to_string(), |d| format!("{d:.1} days"));
        let evidence = findings.evidence.as_ref().map_or_else(
            || {
                let raw: String = findings.text.chars().take(PROMPT_RAW_CHARS).collect();
                format!("### Raw research notes\n{raw}\n")
            },
            render_evidence,
        );

        format!(
            r#"You are a conservative forecaster evaluating a prediction market. Estimate the probability that the question resolves YES.

## Market
Question: {title}
Description: {description}
Market-implied probability of YES: {implied:.1}%
Liquidity: ${liquidity:.0}
Time to resolution: {resolution}

## Research
{evidence}
## Rules
- Stay close to the market price unless the evidence clearly says otherwise.
- Use "low" confidence when evidence is thin, stale or contradictory.
- Recommend "YES" only if your estimate is above the market price, "NO" only if below, otherwise "ABSTAIN".

## Output (JSON only)
```json
{{
  "estimated_probability": 0.0,
  "confidence_level": "high" | "medium" | "low",
  "decision": "YES" | "NO" | "ABSTAIN",
  "key_risks": ["..."],
  "reasoning_summary": "Two or three sentences"
}}
```
"#,
            title = market.title,
            description = if market.description.is_empty() {
                "(none)"
            } else {
                market.description.as_str()
            },
            implied = market.implied_probability * 100.0,
            liquidity = market.liquidity,
        )
    }
}

fn render_evidence(evidence: &Evidence) -> String {
    let mut out = String::new();
    for (heading, items) in [
        ("Recent developments", &evidence.recent_developments),
        ("Evidence for YES", &evidence.evidence_yes),
        ("Evidence for NO", &evidence.evidence_no),
        ("Official signals", &evidence.official_signals),
        ("Timeline constraints", &evidence.timeline_constraints),
    ] {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "### {heading}");
        for item in items.iter().take(PROMPT_EVIDENCE_ITEMS) {
            let _ = writeln!(out, "- {item}");
        }
    }
    let _ = writeln!(out, "Source quality: {:?}", evidence.source_quality);
    out
}

#[async_trait]
impl Judge for LlmJudge {
    fn name(&self) -> &'static str {
        self.llm.name()
    }

    async fn judge(
        &self,
        market: &MarketRecord,
        findings: &ResearchFinding,
    ) -> Result<String, CollaboratorError> {
        let prompt = Self::build_prompt(market, findings);
        let text = self.llm.complete(&prompt).await?;
        debug!(provider = self.llm.name(), market_id = %market.id, "Judgment completion received");
        Ok(text)
    }
}
