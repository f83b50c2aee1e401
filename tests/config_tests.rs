//! Configuration file loading.

mod support;

use edgescout::domain::judgment::Confidence;
use edgescout::error::{ConfigError, Error};
use edgescout::infrastructure::config::llm::LlmProvider;
use edgescout::infrastructure::config::settings::Config;
use support::config::{isolated_config, write_temp_config};

#[test]
fn example_config_parses_to_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let example = Config::load(path).unwrap();
    let defaults = Config::default();

    assert_eq!(example.scan.max_markets, defaults.scan.max_markets);
    assert_eq!(example.scan.gamma_url, defaults.scan.gamma_url);
    assert_eq!(example.filter.min_liquidity, defaults.filter.min_liquidity);
    assert_eq!(example.worthiness.min_score, defaults.worthiness.min_score);
    assert_eq!(example.judgment.min_confidence, Confidence::Medium);
    assert_eq!(example.ranking.cooldown_hours, defaults.ranking.cooldown_hours);
    assert_eq!(example.invoker.run_timeout_secs, defaults.invoker.run_timeout_secs);
    assert_eq!(example.llm.provider, LlmProvider::Anthropic);
    assert_eq!(example.research.model, "sonar-pro");
    assert!(!example.telegram.enabled);
    assert_eq!(example.schedule.lock_file, "data/edgescout.lock");
}

#[test]
fn isolated_config_points_state_into_the_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let (_guard, path) = write_temp_config(&isolated_config(dir.path()));

    let config = Config::load(&path).unwrap();

    assert!(config.database.starts_with(&*dir.path().to_string_lossy()));
    assert!(config.report.dir.ends_with("reports"));
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn invalid_file_names_the_offending_field() {
    let (_guard, path) = write_temp_config("[invoker]\nparallelism = 0\n");

    let err = Config::load(&path).unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "invoker.parallelism",
            ..
        })
    ));
    assert!(err.to_string().contains("invoker.parallelism"));
}

#[test]
fn unknown_confidence_level_is_a_parse_error() {
    let (_guard, path) = write_temp_config("[judgment]\nmin_confidence = \"certain\"\n");

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}
