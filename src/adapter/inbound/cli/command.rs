//! Command-line interface definitions.
//!
//! Defines the CLI structure for the edgescout application using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Prediction market research scanner
#[derive(Parser, Debug)]
#[command(name = "edgescout")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [default: ./config.toml, then ~/.edgescout/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the edgescout CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline once
    Run(RunArgs),

    /// Run the pipeline now and then on a fixed interval until Ctrl-C
    Schedule(ScheduleArgs),

    /// Show recent runs from the run log
    Status(StatusArgs),

    /// Validate the configuration and report missing credentials
    CheckConfig,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Keep state in memory and skip notifications; the report is printed
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `schedule` subcommand.
#[derive(Parser, Debug, Default)]
pub struct ScheduleArgs {
    /// Hours between runs (overrides `[schedule].interval_hours`)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_hours: Option<u64>,
}

/// Arguments for the `status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Number of runs to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Number of recent judgments to show (0 hides them)
    #[arg(long, default_value_t = 10)]
    pub predictions: usize,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_config_after_subcommand() {
        let cli = Cli::parse_from(["edgescout", "run", "--dry-run", "--config", "alt.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Commands::Run(RunArgs { dry_run: true })));
    }

    #[test]
    fn interval_must_be_positive() {
        assert!(Cli::try_parse_from(["edgescout", "schedule", "--interval-hours", "0"]).is_err());
        let cli = Cli::parse_from(["edgescout", "schedule", "--interval-hours", "2"]);
        assert!(matches!(
            cli.command,
            Commands::Schedule(ScheduleArgs { interval_hours: Some(2) })
        ));
    }

    #[test]
    fn status_limit_defaults_to_ten() {
        let cli = Cli::parse_from(["edgescout", "status"]);
        assert!(matches!(
            cli.command,
            Commands::Status(StatusArgs { limit: 10, predictions: 10 })
        ));

        let cli = Cli::parse_from(["edgescout", "status", "--predictions", "0"]);
        assert!(matches!(cli.command, Commands::Status(StatusArgs { predictions: 0, .. })));
    }
}
