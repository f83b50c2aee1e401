//! Evidence-gathering collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::CollaboratorError;
use crate::port::{Llm, Researcher};

/// Researcher that asks an LLM (typically one with live web search) for
/// evidence about a market question.
pub struct LlmResearcher {
    llm: Arc<dyn Llm>,
}

impl LlmResearcher {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    /// The prompt asks for evidence only. Probability estimates are left to
    /// the judgment stage so research cannot anchor the judge.
    fn build_prompt(topic: &str, question: &str) -> String {
        format!(
            r#"You are a research assistant for prediction markets. Gather recent, verifiable evidence about the question below.

## Topic
{topic}

## Question
{question}

## Instructions
- Report facts and sources only. Do NOT estimate probabilities or recommend a side.
- Prefer official statements, primary sources and reporting from the last 30 days.
- Note any deadlines or procedural steps that constrain when the question can resolve.

## Output (JSON only)
```json
{{
  "recent_developments": ["..."],
  "evidence_yes": ["..."],
  "evidence_no": ["..."],
  "official_signals": ["..."],
  "timeline_constraints": ["..."],
  "source_quality": "high" | "medium" | "low"
}}
```
"#
        )
    }
}

#[async_trait]
impl Researcher for LlmResearcher {
    fn name(&self) -> &'static str {
        self.llm.name()
    }

    async fn research(&self, topic: &str, question: &str) -> Result<String, CollaboratorError> {
        let prompt = Self::build_prompt(topic, question);
        let text = self.llm.complete(&prompt).await?;
        debug!(provider = self.llm.name(), chars = text.len(), "Research completion received");
        Ok(text)
    }
}
