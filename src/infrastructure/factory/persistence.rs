//! Persistence factory for the database and report stores.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::report::{CompositeReportStore, FileReportStore};
use crate::adapter::outbound::sqlite::{
    self, DbPool, SqlitePredictionLog, SqliteRunLog, SqliteSeenStore,
};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{PredictionLog, ReportStore, SeenMarketStore};

/// Durable stores used by a live run.
pub struct Persistence {
    pub seen: Arc<dyn SeenMarketStore>,
    /// Report file first, run log mirrored.
    pub reports: Arc<dyn ReportStore>,
    pub predictions: Arc<dyn PredictionLog>,
}

/// Open the configured SQLite database, creating its directory and
/// applying migrations.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the database cannot
/// be opened or a migration fails.
pub fn open_database(config: &Config) -> Result<DbPool> {
    if let Some(parent) = Path::new(&config.database).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let pool = sqlite::open(&config.database)?;
    info!(database = %config.database, "Database ready");
    Ok(pool)
}

/// Build the seen-market store, the report store and the judgment history
/// over one pool.
///
/// # Errors
///
/// Propagates [`open_database`] failures.
pub fn build_persistence(config: &Config) -> Result<Persistence> {
    let pool = open_database(config)?;
    let reports = CompositeReportStore::new(Arc::new(FileReportStore::new(&config.report.dir)))
        .with(Arc::new(SqliteRunLog::new(pool.clone())));

    Ok(Persistence {
        seen: Arc::new(SqliteSeenStore::new(pool.clone())),
        reports: Arc::new(reports),
        predictions: Arc::new(SqlitePredictionLog::new(pool)),
    })
}

/// Open the run log for reading run history.
///
/// # Errors
///
/// Propagates [`open_database`] failures.
pub fn build_run_log(config: &Config) -> Result<SqliteRunLog> {
    Ok(SqliteRunLog::new(open_database(config)?))
}

/// Open the judgment history for reading.
///
/// # Errors
///
/// Propagates [`open_database`] failures.
pub fn build_prediction_log(config: &Config) -> Result<SqlitePredictionLog> {
    Ok(SqlitePredictionLog::new(open_database(config)?))
}
