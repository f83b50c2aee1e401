//! LLM completion port for research and judgment adapters.

use async_trait::async_trait;

use crate::error::CollaboratorError;

/// Client for large language model text completion.
///
/// Implementations wrap specific LLM providers (Anthropic, OpenAI,
/// Perplexity) and handle authentication and response decoding. Retries,
/// timeouts and rate limiting are applied by the caller.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) to support concurrent
/// requests for independent markets.
///
/// # Errors
///
/// [`complete`](Self::complete) classifies failures as a
/// [`CollaboratorError`] so that retry policies can tell transient failures
/// from permanent ones.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a completion request and return the generated text.
    async fn complete(&self, prompt: &str) -> Result<String, CollaboratorError>;
}
