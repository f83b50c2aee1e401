//! Handler for the `check-config` command.

use super::{output, ConfigSource};
use crate::adapter::outbound::llm::anthropic;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::llm::LlmProvider;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::llm::{OPENAI_KEY_VAR, PERPLEXITY_KEY_VAR};

const TELEGRAM_VARS: [&str; 2] = ["TELEGRAM_BOT_TOKEN", "TELEGRAM_CHAT_ID"];

/// Print the effective configuration and check required credentials.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] naming the first missing API key.
pub fn execute(config: &Config, source: &ConfigSource) -> Result<()> {
    output::section("Configuration Check");
    output::field("Config", source);
    output::success("Configuration is valid");

    let judge = config.llm.active();
    output::section("Summary");
    output::field("Judge", format!("{:?} / {}", config.llm.provider, judge.model));
    output::field("Research", format!("perplexity / {}", config.research.model));
    output::field(
        "Funnel",
        format!(
            "{} markets → top {} researched → top {} judged → top {} reported",
            config.scan.max_markets,
            config.worthiness.max_research,
            config.judgment.max_judge,
            config.ranking.max_report
        ),
    );
    output::field("Min edge", format!("{:.1}%", config.ranking.min_edge * 100.0));
    output::field("Cooldown", format!("{}h", config.ranking.cooldown_hours));
    output::field("Database", &config.database);
    output::field("Reports", &config.report.dir);
    output::field("Interval", format!("{}h", config.schedule.interval_hours));

    output::section("Credentials");
    let mut missing = None;
    for var in required_keys(config) {
        if is_set(var) {
            output::success(&format!("{var} set"));
        } else {
            output::warning(&format!("{var} not set"));
            missing.get_or_insert(var);
        }
    }

    if config.telegram.enabled {
        let absent: Vec<_> = TELEGRAM_VARS.into_iter().filter(|v| !is_set(v)).collect();
        if absent.is_empty() {
            output::success("Telegram configured");
        } else {
            output::warning(&format!(
                "Telegram enabled but {} not set, notifications will only be logged",
                absent.join(" and ")
            ));
        }
    } else {
        output::field("Telegram", output::muted("disabled"));
    }

    match missing {
        Some(field) => Err(ConfigError::MissingField { field }.into()),
        None => {
            output::success("Configuration check complete");
            Ok(())
        }
    }
}

fn required_keys(config: &Config) -> [&'static str; 2] {
    let judge = match config.llm.provider {
        LlmProvider::Anthropic => anthropic::API_KEY_VAR,
        LlmProvider::OpenAi => OPENAI_KEY_VAR,
    };
    [judge, PERPLEXITY_KEY_VAR]
}

fn is_set(var: &str) -> bool {
    std::env::var(var).is_ok_and(|v| !v.trim().is_empty())
}
