//! Shared HTTP plumbing for LLM providers.
//!
//! Every provider posts JSON and reads JSON back. The helpers here classify
//! the failure modes into [`CollaboratorError`] so that the caller's retry
//! policy can tell transient failures from permanent ones.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{CollaboratorError, ConfigError, Error};

/// Longest slice of an error body kept in a [`CollaboratorError::Status`].
const MAX_ERROR_BODY: usize = 300;

/// Build an HTTP client with a connect timeout.
///
/// The overall request timeout is owned by the caller's call guard, not by
/// the client.
pub fn http_client(connect_timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(connect_timeout)
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build LLM HTTP client, using defaults");
            Client::new()
        })
}

/// Send `request` and decode a JSON response body.
///
/// # Errors
///
/// Transport failures map to [`CollaboratorError::Transport`] or
/// [`CollaboratorError::Timeout`], non-success statuses through
/// [`CollaboratorError::from_status`], and undecodable bodies to
/// [`CollaboratorError::Malformed`].
pub async fn send_json<T>(request: RequestBuilder) -> Result<T, CollaboratorError>
where
    T: DeserializeOwned,
{
    let response = request
        .send()
        .await
        .map_err(|e| CollaboratorError::from_reqwest(&e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CollaboratorError::from_status(
            status.as_u16(),
            truncate(body.trim(), MAX_ERROR_BODY),
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CollaboratorError::Malformed(e.to_string()))
}

/// Read a non-blank API key from `var`.
///
/// # Errors
///
/// [`ConfigError::MissingField`] naming the variable.
pub fn api_key_from_env(var: &'static str) -> crate::error::Result<String> {
    std::env::var(var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or(Error::Config(ConfigError::MissingField { field: var }))
}

/// Reject an empty completion.
pub fn non_empty(provider: &str, text: String) -> Result<String, CollaboratorError> {
    if text.trim().is_empty() {
        return Err(CollaboratorError::Malformed(format!(
            "{provider} returned no content"
        )));
    }
    Ok(text)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
