//! LLM provider configuration.
//!
//! Two collaborators talk to language models: the judge (Anthropic or
//! OpenAI) and the researcher (Perplexity). API keys are read from
//! environment variables at runtime, never from the config file.

use serde::Deserialize;

/// Judgment model configuration.
///
/// API keys come from `ANTHROPIC_API_KEY` or `OPENAI_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Provider used for judgment. Defaults to Anthropic.
    #[serde(default)]
    pub provider: LlmProvider,

    /// Used when `provider` is `anthropic`.
    #[serde(default = "default_anthropic")]
    pub anthropic: ModelConfig,

    /// Used when `provider` is `openai`.
    #[serde(default = "default_openai")]
    pub openai: ModelConfig,
}

/// LLM provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Anthropic Claude models.
    #[default]
    Anthropic,
    /// OpenAI GPT models.
    OpenAi,
}

/// Model parameters shared by every provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model identifier.
    pub model: String,

    /// Sampling temperature in `[0, 1]`. Lower is more deterministic.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens in the response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

/// Research model configuration (Perplexity, key from `PERPLEXITY_API_KEY`).
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchConfig {
    #[serde(default = "default_research_model")]
    pub model: String,
    #[serde(default = "default_research_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            model: default_research_model(),
            temperature: default_research_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            anthropic: default_anthropic(),
            openai: default_openai(),
        }
    }
}

fn default_anthropic() -> ModelConfig {
    ModelConfig {
        model: "claude-sonnet-4-5".into(),
        temperature: default_temperature(),
        max_tokens: default_max_tokens(),
    }
}

fn default_openai() -> ModelConfig {
    ModelConfig {
        model: "gpt-4o".into(),
        temperature: default_temperature(),
        max_tokens: default_max_tokens(),
    }
}

fn default_research_model() -> String {
    "sonar-pro".into()
}

const fn default_temperature() -> f64 {
    0.2
}

const fn default_research_temperature() -> f64 {
    0.1
}

const fn default_max_tokens() -> usize {
    2048
}

impl LlmConfig {
    /// Model parameters of the selected provider.
    #[must_use]
    pub fn active(&self) -> &ModelConfig {
        match self.provider {
            LlmProvider::Anthropic => &self.anthropic,
            LlmProvider::OpenAi => &self.openai,
        }
    }
}
