//! OpenAI-compatible chat completions client.
//!
//! Provides an implementation of the [`Llm`] trait for the OpenAI Chat
//! Completions API. Perplexity exposes the same wire format with live web
//! search behind it, so the research stage uses this client pointed at the
//! Perplexity endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::client::{api_key_from_env, http_client, non_empty, send_json};
use crate::error::{CollaboratorError, Result};
use crate::port::outbound::llm::Llm;

/// OpenAI Chat Completions API endpoint.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Perplexity Chat Completions API endpoint.
pub const PERPLEXITY_API_URL: &str = "https://api.perplexity.ai/chat/completions";

/// OpenAI-compatible API client.
#[derive(Debug)]
pub struct OpenAi {
    client: Client,
    provider: &'static str,
    api_url: String,
    api_key: String,
    /// Model identifier (e.g., "gpt-4o", "sonar-pro").
    model: String,
    max_tokens: usize,
    temperature: f64,
}

impl OpenAi {
    /// Create a new OpenAI client with explicit configuration.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: usize,
        temperature: f64,
    ) -> Self {
        Self {
            client: http_client(Duration::from_secs(10)),
            provider: "openai",
            api_url: OPENAI_API_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Create a Perplexity client.
    #[must_use]
    pub fn perplexity(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: usize,
        temperature: f64,
    ) -> Self {
        Self {
            provider: "perplexity",
            api_url: PERPLEXITY_API_URL.to_string(),
            ..Self::new(api_key, model, max_tokens, temperature)
        }
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Read an API key from `var`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the variable when it is unset
    /// or blank.
    pub fn api_key_from_env(var: &'static str) -> Result<String> {
        api_key_from_env(var)
    }
}

#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    max_tokens: usize,
    temperature: f64,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl Response {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Llm for OpenAi {
    fn name(&self) -> &'static str {
        self.provider
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, CollaboratorError> {
        let request = Request {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response: Response = send_json(
            self.client
                .post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(&request),
        )
        .await?;

        non_empty(self.provider, response.into_text())
    }
}
