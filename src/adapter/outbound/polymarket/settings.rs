//! Polymarket scan configuration (`[scan]` section).

use serde::Deserialize;

/// Market discovery settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Markets requested per run.
    #[serde(default = "default_max_markets")]
    pub max_markets: usize,
    /// Gamma API base URL.
    #[serde(default = "default_gamma_url")]
    pub gamma_url: String,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_max_markets() -> usize {
    100
}

fn default_gamma_url() -> String {
    "https://gamma-api.polymarket.com".into()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_markets: default_max_markets(),
            gamma_url: default_gamma_url(),
            http: HttpConfig::default(),
        }
    }
}

/// HTTP client settings for the Gamma API.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    15_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_retry_max_attempts() -> u32 {
    3
}

const fn default_retry_backoff_ms() -> u64 {
    1_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let config: ScanConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_markets, 100);
        assert_eq!(config.gamma_url, "https://gamma-api.polymarket.com");
        assert_eq!(config.http.retry_max_attempts, 3);
    }

    #[test]
    fn nested_http_section_overrides() {
        let config: ScanConfig = toml::from_str("max_markets = 50\n[http]\ntimeout_ms = 2000").unwrap();
        assert_eq!(config.max_markets, 50);
        assert_eq!(config.http.timeout_ms, 2000);
        assert_eq!(config.http.connect_timeout_ms, 5_000);
    }
}
