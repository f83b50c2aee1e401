//! Report assembly.
//!
//! Folds the ranked opportunities of a run into the persisted report and,
//! when there is something to say, the notification payload.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::domain::id::RunId;
use crate::domain::judgment::Decision;
use crate::domain::opportunity::Opportunity;
use crate::domain::report::{NotificationEntry, NotificationPayload, RunReport, RunStats};

const RULE_WIDTH: usize = 80;
/// Key risks listed per opportunity in the text report.
const REPORT_KEY_RISKS: usize = 5;

/// Builds run reports and notification payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Assemble the report for one run.
    ///
    /// The payload is `None` when there are no opportunities; an empty run
    /// is still reported.
    #[must_use]
    pub fn assemble(
        &self,
        run_id: RunId,
        run_at: DateTime<Utc>,
        mut stats: RunStats,
        opportunities: Vec<Opportunity>,
    ) -> (RunReport, Option<NotificationPayload>) {
        stats.opportunities = opportunities.len();

        let payload = (!opportunities.is_empty()).then(|| NotificationPayload {
            run_id: run_id.clone(),
            run_at,
            entries: opportunities.iter().map(NotificationEntry::from).collect(),
        });

        let report = RunReport {
            run_id,
            run_at,
            stats,
            opportunities,
        };
        (report, payload)
    }
}

/// Render a report as plain text for the report file.
#[must_use]
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let stats = &report.stats;

    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "  PREDICTION MARKET OPPORTUNITY REPORT");
    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "Run: {}", report.run_id);
    let _ = writeln!(out, "Generated: {}", report.run_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(
        out,
        "Markets: {} scanned, {} filtered, {} researched, {} judged",
        stats.scanned, stats.filtered, stats.researched, stats.judged
    );
    let _ = writeln!(out, "Opportunities Found: {}", report.opportunities.len());
    if stats.suppressed > 0 {
        let _ = writeln!(out, "Suppressed by cooldown: {}", stats.suppressed);
    }
    if stats.research_failures + stats.judgment_failures > 0 {
        let _ = writeln!(
            out,
            "Collaborator failures: {} research, {} judgment",
            stats.research_failures, stats.judgment_failures
        );
    }
    if stats.timed_out {
        let _ = writeln!(out, "Run deadline reached; results are partial.");
    }
    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out);

    if report.opportunities.is_empty() {
        let _ = writeln!(out, "No opportunities found.");
        return out;
    }

    write_summary(&mut out, &report.opportunities, &light);
    let _ = writeln!(out);
    let _ = writeln!(out, "RANKED OPPORTUNITIES");
    let _ = writeln!(out, "{light}");
    for (rank, opp) in report.opportunities.iter().enumerate() {
        write_opportunity(&mut out, rank + 1, opp, report.run_at);
        let _ = writeln!(out);
    }
    out
}

fn write_summary(out: &mut String, opportunities: &[Opportunity], rule: &str) {
    let total = opportunities.len() as f64;
    let yes = opportunities.iter().filter(|o| o.decision() == Decision::Yes).count();
    let no = opportunities.iter().filter(|o| o.decision() == Decision::No).count();
    let avg_score = opportunities.iter().map(Opportunity::score).sum::<f64>() / total;
    let avg_edge = opportunities.iter().map(Opportunity::edge).sum::<f64>() / total;
    let liquidity: f64 = opportunities.iter().map(|o| o.market().liquidity).sum();

    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "  YES recommendations: {yes}");
    let _ = writeln!(out, "  NO recommendations: {no}");
    let _ = writeln!(out, "  Average score: {avg_score:.3}");
    let _ = writeln!(out, "  Average edge: {:.1}%", avg_edge * 100.0);
    let _ = writeln!(out, "  Total liquidity: ${liquidity:.0}");
}

fn write_opportunity(out: &mut String, rank: usize, opp: &Opportunity, now: DateTime<Utc>) {
    let market = opp.market();
    let judgment = opp.judgment();

    let _ = writeln!(out, "[{rank}] {}", market.title);
    let _ = writeln!(out, "    Market ID: {}", market.id);
    let _ = writeln!(out, "    Link: {}", market.url());
    let _ = writeln!(out, "    Decision: {}", opp.decision());
    let _ = writeln!(out, "    Score: {:.3}", opp.score());
    let _ = writeln!(out, "    Market probability: {:.1}%", market.implied_probability * 100.0);
    let _ = writeln!(
        out,
        "    Estimated probability: {:.1}%",
        judgment.estimated_probability() * 100.0
    );
    let _ = writeln!(out, "    Edge: {:+.1} points", opp.signed_edge() * 100.0);
    let _ = writeln!(out, "    Confidence: {}", judgment.confidence);
    let _ = writeln!(out, "    Liquidity: ${:.0}", market.liquidity);
    let _ = writeln!(out, "    Volume (24h): ${:.0}", market.volume_24h);
    let _ = writeln!(
        out,
        "    Time to resolution: {}",
        format_time_to_resolution(market.end_date, now)
    );
    let _ = writeln!(out, "    {}", opp.explanation());
    if !judgment.rationale.is_empty() {
        let _ = writeln!(out, "    Rationale: {}", judgment.rationale);
    }
    if !judgment.key_risks.is_empty() {
        let _ = writeln!(out, "    Key risks:");
        for risk in judgment.key_risks.iter().take(REPORT_KEY_RISKS) {
            let _ = writeln!(out, "      - {risk}");
        }
    }
}

fn format_time_to_resolution(end_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(end) = end_date else {
        return "Unknown".to_string();
    };
    if end <= now {
        return "Resolved".to_string();
    }
    let delta = end - now;
    let days = delta.num_days();
    let hours = delta.num_hours() % 24;
    match (days, hours) {
        (0, 0) => format!("{} minutes", delta.num_minutes()),
        (0, h) => format!("{h} hours"),
        (d, 0) => format!("{d} days"),
        (d, h) => format!("{d} days, {h} hours"),
    }
}
