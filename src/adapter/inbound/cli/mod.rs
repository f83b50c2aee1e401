//! Command-line interface.
//!
//! [`execute`] resolves the configuration, initialises logging and
//! dispatches to one handler per subcommand.

pub mod check;
pub mod command;
pub mod output;
pub mod paths;
pub mod run;
pub mod schedule;
pub mod status;

use std::path::{Path, PathBuf};

use tracing::debug;

use self::command::{Cli, Commands};
use self::output::OutputConfig;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Load the configuration named on the command line, or the first default
/// file found, or the built-in defaults.
///
/// # Errors
///
/// An explicitly named file must exist and validate.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, ConfigSource)> {
    match explicit.map(Path::to_path_buf).or_else(paths::default_config) {
        Some(path) => Ok((Config::load(&path)?, ConfigSource::File(path))),
        None => Ok((Config::default(), ConfigSource::Defaults)),
    }
}

/// Run one CLI invocation.
///
/// # Errors
///
/// Returns configuration errors and the handler's own failure.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let (config, source) = load_config(cli.config.as_deref())?;
    config.init_logging();
    debug!(config = %source, "Configuration loaded");

    match cli.command {
        Commands::Run(args) => run::execute(&config, &args).await,
        Commands::Schedule(args) => schedule::execute(&config, &args).await,
        Commands::Status(args) => status::execute(&config, &args),
        Commands::CheckConfig => check::execute(&config, &source),
    }
}
