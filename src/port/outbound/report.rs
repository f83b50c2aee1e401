//! Report persistence ports (write side and read side).

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::report::RunReport;
use crate::error::Result;

/// Where a report ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReport {
    /// File path or row identifier.
    pub location: String,
}

/// Append-only storage for run reports.
///
/// Each call stores a new record; existing records are never overwritten.
#[async_trait]
pub trait ReportStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn persist(&self, report: &RunReport) -> Result<PersistedReport>;
}

/// Summary row returned by run-log queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub run_at: String,
    pub scanned: i32,
    pub filtered: i32,
    pub researched: i32,
    pub judged: i32,
    pub opportunities: i32,
    pub suppressed: i32,
    pub timed_out: bool,
}

/// Read-side run history contract.
pub trait RunLogReader: Send + Sync {
    /// Most recent runs, newest first.
    fn recent_runs(&self, limit: usize) -> Result<Vec<RunSummary>>;
}
