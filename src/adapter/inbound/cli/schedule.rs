//! Handler for the `schedule` command.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::command::ScheduleArgs;
use super::output;
use crate::application::Scheduler;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::pipeline::{build_pipeline, RunMode};
use crate::infrastructure::lock::InstanceLock;

/// Run immediately, then every interval until Ctrl-C.
///
/// A run in flight when the signal arrives is allowed to finish.
pub async fn execute(config: &Config, args: &ScheduleArgs) -> Result<()> {
    let _lock = InstanceLock::acquire(&config.schedule.lock_file)?;
    let interval = args
        .interval_hours
        .map_or_else(|| config.schedule_interval(), |h| Duration::from_secs(h * 3600));

    let pipeline = build_pipeline(config, RunMode::Live)?;
    let scheduler = Scheduler::new(Arc::new(pipeline), interval);

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Interval", format!("{}h", interval.as_secs() / 3600));
    output::hint("press Ctrl-C to stop");

    let summary = scheduler.run_until(shutdown_signal()).await;

    output::section("Scheduler stopped");
    output::field("Completed", summary.completed);
    output::field("Failed", summary.failed);
    output::field("Skipped", summary.skipped);
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Cannot listen for Ctrl-C, stopping scheduler"),
    }
}
