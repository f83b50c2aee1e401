//! Handler for the `run` command.

use serde_json::json;

use super::command::RunArgs;
use super::output;
use crate::application::report::render_text;
use crate::application::RunOutcome;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::pipeline::{build_pipeline, RunMode};
use crate::infrastructure::lock::InstanceLock;

/// Execute one pipeline run.
///
/// Live runs hold the instance lock for their whole duration. Dry runs
/// touch no shared state, so they skip it and print the full report.
pub async fn execute(config: &Config, args: &RunArgs) -> Result<()> {
    let (mode, _lock) = if args.dry_run {
        (RunMode::DryRun, None)
    } else {
        let lock = InstanceLock::acquire(&config.schedule.lock_file)?;
        (RunMode::Live, Some(lock))
    };

    let pipeline = build_pipeline(config, mode)?;
    output::header(env!("CARGO_PKG_VERSION"));
    if args.dry_run {
        output::hint("dry run: state stays in memory and no notifications are sent");
    }

    let outcome = pipeline.run().await?;
    print_outcome(&outcome);
    if args.dry_run {
        if output::is_json() {
            output::json_output(json!({ "report": outcome.report }));
        } else {
            output::section("Report");
            output::lines(&render_text(&outcome.report));
        }
    }
    Ok(())
}

/// Print the summary of a finished run.
pub fn print_outcome(outcome: &RunOutcome) {
    let report = &outcome.report;
    let stats = &report.stats;

    output::section("Run complete");
    output::field("Run", &report.run_id);
    output::field(
        "Funnel",
        format!(
            "{} scanned → {} filtered → {} worthy → {} researched → {} judged",
            stats.scanned, stats.filtered, stats.worthy, stats.researched, stats.judged
        ),
    );
    if stats.research_failures + stats.judgment_failures > 0 {
        output::warning(&format!(
            "{} research and {} judgment calls failed",
            stats.research_failures, stats.judgment_failures
        ));
    }
    if stats.timed_out {
        output::warning("run deadline reached, results are partial");
    }
    if stats.suppressed > 0 {
        output::field("Suppressed", stats.suppressed);
    }
    output::field("Report", &outcome.persisted.location);

    if report.is_empty() {
        output::success("No opportunities found");
        return;
    }

    output::section("Opportunities");
    for (i, opp) in report.opportunities.iter().enumerate() {
        output::opportunity(i + 1, opp.decision().as_str(), opp.edge(), &opp.market().title);
    }

    if let Some(delivery) = &outcome.delivery {
        for failure in &delivery.failed {
            output::warning(&failure.to_string());
        }
        if !delivery.delivered.is_empty() {
            output::success(&format!("Notified via {}", delivery.delivered.join(", ")));
        }
    }
}
