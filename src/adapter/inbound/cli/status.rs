//! Handler for the `status` command.

use std::path::Path;

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::command::StatusArgs;
use super::output;
use crate::domain::prediction::PredictionRecord;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::persistence::{build_prediction_log, build_run_log};
use crate::port::{PredictionReader, RunLogReader, RunSummary};

#[derive(Tabled)]
struct RunRow {
    #[tabled(rename = "Run at")]
    run_at: String,
    #[tabled(rename = "Scanned")]
    scanned: i32,
    #[tabled(rename = "Filtered")]
    filtered: i32,
    #[tabled(rename = "Researched")]
    researched: i32,
    #[tabled(rename = "Judged")]
    judged: i32,
    #[tabled(rename = "Reported")]
    opportunities: i32,
    #[tabled(rename = "Suppressed")]
    suppressed: i32,
    #[tabled(rename = "Partial")]
    partial: &'static str,
}

impl From<&RunSummary> for RunRow {
    fn from(run: &RunSummary) -> Self {
        Self {
            run_at: run.run_at.clone(),
            scanned: run.scanned,
            filtered: run.filtered,
            researched: run.researched,
            judged: run.judged,
            opportunities: run.opportunities,
            suppressed: run.suppressed,
            partial: if run.timed_out { "yes" } else { "" },
        }
    }
}

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Judged at")]
    recorded_at: String,
    #[tabled(rename = "Market")]
    title: String,
    #[tabled(rename = "Market %")]
    implied: String,
    #[tabled(rename = "Estimate %")]
    estimated: String,
    #[tabled(rename = "Call")]
    decision: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
}

/// Longest market title shown in the judgment table.
const TITLE_CHARS: usize = 48;

impl From<&PredictionRecord> for PredictionRow {
    fn from(p: &PredictionRecord) -> Self {
        let mut title: String = p.title.chars().take(TITLE_CHARS).collect();
        if p.title.chars().count() > TITLE_CHARS {
            title.push('…');
        }
        Self {
            recorded_at: p.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
            title,
            implied: format!("{:.1}", p.implied_probability * 100.0),
            estimated: format!("{:.1}", p.estimated_probability * 100.0),
            decision: p.decision.to_string(),
            confidence: p.confidence.to_string(),
            outcome: p.outcome.to_string(),
        }
    }
}

/// Show the most recent runs and judgments, newest first.
pub fn execute(config: &Config, args: &StatusArgs) -> Result<()> {
    if !Path::new(&config.database).exists() {
        if output::is_json() {
            output::json_output(json!({
                "command": "status",
                "database": config.database,
                "status": "missing_database",
            }));
        } else {
            output::warning(&format!("Database not found ({})", config.database));
            output::hint("run `edgescout run` to create it");
        }
        return Ok(());
    }

    let runs = build_run_log(config)?.recent_runs(args.limit)?;
    let predictions = if args.predictions == 0 {
        Vec::new()
    } else {
        build_prediction_log(config)?.recent_predictions(args.predictions)?
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "status",
            "database": config.database,
            "status": "ok",
            "runs": runs,
            "predictions": predictions,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Database", &config.database);
    if runs.is_empty() {
        output::section("No runs recorded yet");
        return Ok(());
    }

    println!();
    println!("{}", render_table(&runs));

    if !predictions.is_empty() {
        output::section("Recent judgments");
        println!("{}", render_predictions(&predictions));
    }
    Ok(())
}

fn render_table(runs: &[RunSummary]) -> String {
    let rows: Vec<RunRow> = runs.iter().map(RunRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_predictions(predictions: &[PredictionRecord]) -> String {
    let rows: Vec<PredictionRow> = predictions.iter().map(PredictionRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::id::RunId;
    use crate::domain::judgment::{Confidence, Decision, Judgment};
    use crate::domain::market::MarketRecord;
    use crate::domain::prediction::PredictionOutcome;

    #[test]
    fn judgment_table_shows_outcome_and_shortens_titles() {
        let long_title = "Will the central bank cut rates at the meeting after next, or hold?";
        let market = MarketRecord::new("m", long_title, 5_000.0, 900.0, 0.42);
        let judgment = Judgment::try_new(Decision::Yes, 0.55, Confidence::Medium, "why").unwrap();
        let record = PredictionRecord::new(
            RunId::new(),
            &market,
            &judgment,
            PredictionOutcome::BelowThreshold,
            Utc::now(),
        );

        let table = render_predictions(&[record]);
        assert!(table.contains("Outcome"));
        assert!(table.contains("below_threshold"));
        assert!(table.contains("42.0"));
        assert!(table.contains("55.0"));
        assert!(table.contains('…'));
        assert!(!table.contains("or hold?"));
    }

    #[test]
    fn table_lists_runs_and_flags_partial_ones() {
        let runs = vec![
            RunSummary {
                run_id: "a".into(),
                run_at: "2026-03-01T09:00:00.000Z".into(),
                scanned: 100,
                opportunities: 2,
                timed_out: true,
                ..Default::default()
            },
            RunSummary {
                run_id: "b".into(),
                run_at: "2026-03-01T03:00:00.000Z".into(),
                scanned: 90,
                ..Default::default()
            },
        ];

        let table = render_table(&runs);
        assert!(table.contains("Run at"));
        assert!(table.contains("2026-03-01T09:00:00.000Z"));
        assert!(table.contains("yes"));
        assert_eq!(table.matches("2026-03-01").count(), 2);
    }
}
