//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; secrets (API keys, bot token)
//! come from environment variables only.
//!
//! # Example
//!
//! ```no_run
//! use edgescout::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::llm::{LlmConfig, ResearchConfig};
use super::logging::LoggingConfig;
use super::schedule::{ReportConfig, ScheduleConfig};
use super::telegram::TelegramAppConfig;
use crate::adapter::outbound::polymarket::settings::ScanConfig;
use crate::application::filter::FilterConfig;
use crate::application::invoker::InvokerConfig;
use crate::application::judgment::JudgmentConfig;
use crate::application::pipeline::PipelineSettings;
use crate::application::ranking::RankingConfig;
use crate::application::worthiness::WorthinessConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Every section is optional; a missing section takes its defaults. Load
/// from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Market listing: how many markets and from where.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Liquidity and volume thresholds.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Research-worthiness selection.
    #[serde(default)]
    pub worthiness: WorthinessConfig,

    /// Judgment stage limits.
    #[serde(default)]
    pub judgment: JudgmentConfig,

    /// Edge threshold, cooldown and report size.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Parallelism, rate limit, timeouts and retries for AI calls.
    #[serde(default)]
    pub invoker: InvokerConfig,

    /// Judgment model.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Research model.
    #[serde(default)]
    pub research: ResearchConfig,

    #[serde(default)]
    pub telegram: TelegramAppConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Path to SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_database_path() -> String {
    "data/edgescout.db".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`] found.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let counts: [(&'static str, u64); 10] = [
            ("scan.max_markets", self.scan.max_markets as u64),
            ("worthiness.max_research", self.worthiness.max_research as u64),
            ("judgment.max_judge", self.judgment.max_judge as u64),
            ("ranking.max_report", self.ranking.max_report as u64),
            ("invoker.parallelism", self.invoker.parallelism as u64),
            ("invoker.max_attempts", u64::from(self.invoker.max_attempts)),
            ("invoker.call_timeout_secs", self.invoker.call_timeout_secs),
            ("invoker.run_timeout_secs", self.invoker.run_timeout_secs),
            ("schedule.interval_hours", self.schedule.interval_hours),
            ("llm.max_tokens", self.llm.active().max_tokens as u64),
        ];
        for (field, value) in counts {
            if value < 1 {
                return Err(invalid(field, "must be at least 1"));
            }
        }

        if self.filter.min_liquidity < 0.0 {
            return Err(invalid("filter.min_liquidity", "must be 0 or greater"));
        }
        if self.filter.min_volume_24h < 0.0 {
            return Err(invalid("filter.min_volume_24h", "must be 0 or greater"));
        }
        if self.worthiness.min_days_to_resolution < 0.0 {
            return Err(invalid(
                "worthiness.min_days_to_resolution",
                "must be 0 or greater",
            ));
        }
        if self.worthiness.max_days_to_resolution < self.worthiness.min_days_to_resolution {
            return Err(invalid(
                "worthiness.max_days_to_resolution",
                "must be >= min_days_to_resolution",
            ));
        }

        let unit_interval = [
            ("worthiness.min_score", self.worthiness.min_score),
            ("ranking.min_edge", self.ranking.min_edge),
            ("llm.temperature", self.llm.active().temperature),
            ("research.temperature", self.research.temperature),
        ];
        for (field, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0 and 1"));
            }
        }

        if self.invoker.max_backoff_ms < self.invoker.base_backoff_ms {
            return Err(invalid("invoker.max_backoff_ms", "must be >= base_backoff_ms"));
        }
        if self.scan.gamma_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "scan.gamma_url",
            }
            .into());
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        Ok(())
    }

    /// Run-level limits for the pipeline.
    #[must_use]
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            max_markets: self.scan.max_markets,
            max_judge: self.judgment.max_judge,
            parallelism: self.invoker.parallelism,
            run_timeout: self.invoker.run_timeout(),
        }
    }

    #[must_use]
    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.interval_hours * 3600)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}
