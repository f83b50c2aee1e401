//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{predictions, run_reports, seen_markets};

/// Database row for a seen market+decision pair.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = seen_markets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SeenMarketRow {
    pub market_id: String,
    pub decision: String,
    pub reported_at: String,
}

/// Database row for one pipeline run.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = run_reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RunReportRow {
    pub run_id: String,
    pub run_at: String,
    pub scanned: i32,
    pub filtered: i32,
    pub worthy: i32,
    pub researched: i32,
    pub judged: i32,
    pub opportunities: i32,
    pub suppressed: i32,
    pub research_failures: i32,
    pub judgment_failures: i32,
    pub timed_out: i32,
    pub report_json: String,
}

/// Judgment history row as read back, with its surrogate key.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = predictions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PredictionRow {
    pub id: i32,
    pub run_id: String,
    pub market_id: String,
    pub title: String,
    pub recorded_at: String,
    pub implied_probability: f64,
    pub estimated_probability: f64,
    pub decision: String,
    pub confidence: String,
    pub outcome: String,
    pub rationale: String,
    pub research_excerpt: Option<String>,
}

/// Judgment history row to insert; the key is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = predictions)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewPredictionRow {
    pub run_id: String,
    pub market_id: String,
    pub title: String,
    pub recorded_at: String,
    pub implied_probability: f64,
    pub estimated_probability: f64,
    pub decision: String,
    pub confidence: String,
    pub outcome: String,
    pub rationale: String,
    pub research_excerpt: Option<String>,
}
