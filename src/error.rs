use std::time::Duration;

use thiserror::Error;

use crate::domain::id::MarketId;

/// Configuration-related errors with structured variants.
///
/// Any of these is fatal at startup: no pipeline run begins until the
/// configuration loads and validates.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Failure of a single call to an external AI collaborator.
///
/// The variants carry enough information for a [`RetryPolicy`] to decide
/// whether another attempt is worthwhile.
///
/// [`RetryPolicy`]: crate::application::retry::RetryPolicy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("provider returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("cancelled by run deadline")]
    Cancelled,
}

impl CollaboratorError {
    /// Whether the failure is transient and the call may be repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::RateLimited | Self::Transport(_) => true,
            Self::Status { code, .. } => *code >= 500,
            Self::Auth(_) | Self::Malformed(_) | Self::Cancelled => false,
        }
    }

    /// Map a reqwest failure onto the collaborator taxonomy.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(Duration::ZERO);
        }
        if let Some(status) = err.status() {
            return Self::from_status(status.as_u16(), err.to_string());
        }
        if err.is_decode() {
            return Self::Malformed(err.to_string());
        }
        Self::Transport(err.to_string())
    }

    /// Map a non-success HTTP status onto the collaborator taxonomy.
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            401 | 403 => Self::Auth(message),
            429 => Self::RateLimited,
            _ => Self::Status { code, message },
        }
    }
}

/// Failure delivering a notification payload to a sink.
///
/// Always logged by the caller; never aborts report persistence.
#[derive(Error, Debug)]
#[error("{sink} notification failed: {reason}")]
pub struct NotificationError {
    pub sink: &'static str,
    pub reason: String,
}

impl NotificationError {
    pub fn new(sink: &'static str, reason: impl Into<String>) -> Self {
        Self {
            sink,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Market listing could not be fetched. Fatal to the current run only.
    #[error("market provider failed: {0}")]
    Provider(String),

    #[error("research failed for market {market_id}: {source}")]
    Research {
        market_id: MarketId,
        #[source]
        source: CollaboratorError,
    },

    #[error("judgment failed for market {market_id}: {source}")]
    Judgment {
        market_id: MarketId,
        #[source]
        source: CollaboratorError,
    },

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error("a pipeline run is already in progress")]
    RunInProgress,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
