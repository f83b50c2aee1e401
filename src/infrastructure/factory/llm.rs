//! LLM client factory.
//!
//! The judge model is chosen by `[llm].provider`; research always goes to
//! Perplexity. Both fail fast when their API key is missing so a run never
//! starts half-configured.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::llm::anthropic::Anthropic;
use crate::adapter::outbound::llm::openai::OpenAi;
use crate::error::Result;
use crate::infrastructure::config::llm::LlmProvider;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::llm::Llm;

/// Environment variable holding the OpenAI API key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable holding the Perplexity API key.
pub const PERPLEXITY_KEY_VAR: &str = "PERPLEXITY_API_KEY";

/// Build the LLM client used for judgment.
///
/// # Errors
///
/// Returns a configuration error naming the missing API key variable.
pub fn build_judge_llm(config: &Config) -> Result<Arc<dyn Llm>> {
    let model = config.llm.active();
    let client: Arc<dyn Llm> = match config.llm.provider {
        LlmProvider::Anthropic => Arc::new(Anthropic::from_env(
            &model.model,
            model.max_tokens,
            model.temperature,
        )?),
        LlmProvider::OpenAi => Arc::new(OpenAi::new(
            OpenAi::api_key_from_env(OPENAI_KEY_VAR)?,
            &model.model,
            model.max_tokens,
            model.temperature,
        )),
    };

    info!(provider = client.name(), model = %model.model, "Judgment LLM initialized");
    Ok(client)
}

/// Build the LLM client used for research.
///
/// # Errors
///
/// Returns a configuration error when `PERPLEXITY_API_KEY` is not set.
pub fn build_research_llm(config: &Config) -> Result<Arc<dyn Llm>> {
    let research = &config.research;
    let client = OpenAi::perplexity(
        OpenAi::api_key_from_env(PERPLEXITY_KEY_VAR)?,
        &research.model,
        research.max_tokens,
        research.temperature,
    );
    info!(provider = client.name(), model = %research.model, "Research LLM initialized");
    Ok(Arc::new(client))
}
