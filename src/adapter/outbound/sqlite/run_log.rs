//! SQLite run log.
//!
//! Write side: one append-only row per run, with the full report as JSON.
//! Read side: recent run summaries for the `status` command.

use async_trait::async_trait;
use chrono::SecondsFormat;
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::RunReportRow;
use super::database::schema::run_reports;
use crate::domain::report::RunReport;
use crate::error::{Error, Result};
use crate::port::{PersistedReport, ReportStore, RunLogReader, RunSummary};

/// SQLite-backed [`ReportStore`] and [`RunLogReader`].
pub struct SqliteRunLog {
    pool: DbPool,
}

impl SqliteRunLog {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(report: &RunReport) -> Result<RunReportRow> {
        let stats = &report.stats;
        Ok(RunReportRow {
            run_id: report.run_id.to_string(),
            // Fixed-width UTC timestamps sort lexicographically.
            run_at: report.run_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            scanned: count(stats.scanned),
            filtered: count(stats.filtered),
            worthy: count(stats.worthy),
            researched: count(stats.researched),
            judged: count(stats.judged),
            opportunities: count(stats.opportunities),
            suppressed: count(stats.suppressed),
            research_failures: count(stats.research_failures),
            judgment_failures: count(stats.judgment_failures),
            timed_out: i32::from(stats.timed_out),
            report_json: serde_json::to_string(report)?,
        })
    }
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl From<RunReportRow> for RunSummary {
    fn from(row: RunReportRow) -> Self {
        Self {
            run_id: row.run_id,
            run_at: row.run_at,
            scanned: row.scanned,
            filtered: row.filtered,
            researched: row.researched,
            judged: row.judged,
            opportunities: row.opportunities,
            suppressed: row.suppressed,
            timed_out: row.timed_out != 0,
        }
    }
}

#[async_trait]
impl ReportStore for SqliteRunLog {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn persist(&self, report: &RunReport) -> Result<PersistedReport> {
        let row = Self::to_row(report)?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::insert_into(run_reports::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(PersistedReport {
            location: format!("run_reports/{}", row.run_id),
        })
    }
}

impl RunLogReader for SqliteRunLog {
    fn recent_runs(&self, limit: usize) -> Result<Vec<RunSummary>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<RunReportRow> = run_reports::table
            .order(run_reports::run_at.desc())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(RunReportRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.into_iter().map(RunSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use crate::domain::id::RunId;
    use crate::domain::report::RunStats;

    fn report(minutes_ago: i64, opportunities: usize) -> RunReport {
        RunReport {
            run_id: RunId::new(),
            run_at: Utc::now() - Duration::minutes(minutes_ago),
            stats: RunStats {
                scanned: 50,
                opportunities,
                suppressed: 1,
                ..RunStats::default()
            },
            opportunities: vec![],
        }
    }

    #[tokio::test]
    async fn persist_appends_rows_newest_first() {
        let log = SqliteRunLog::new(open(":memory:").unwrap());
        let older = report(30, 0);
        let newer = report(5, 2);

        log.persist(&older).await.unwrap();
        let persisted = log.persist(&newer).await.unwrap();
        assert!(persisted.location.ends_with(newer.run_id.as_str()));

        let runs = log.recent_runs(10).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].run_id, newer.run_id.to_string());
        assert_eq!(runs[0].opportunities, 2);
        assert_eq!(runs[0].suppressed, 1);
        assert_eq!(runs[1].run_id, older.run_id.to_string());
    }

    #[tokio::test]
    async fn same_run_cannot_be_written_twice() {
        let log = SqliteRunLog::new(open(":memory:").unwrap());
        let run = report(0, 0);
        log.persist(&run).await.unwrap();
        assert!(matches!(log.persist(&run).await, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn recent_runs_respects_limit() {
        let log = SqliteRunLog::new(open(":memory:").unwrap());
        for minutes in 0..4 {
            log.persist(&report(minutes, 0)).await.unwrap();
        }
        assert_eq!(log.recent_runs(3).unwrap().len(), 3);
    }
}
