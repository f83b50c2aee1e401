//! Fan-out report store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::report::RunReport;
use crate::error::Result;
use crate::port::{PersistedReport, ReportStore};

/// Persists to a primary store, then mirrors to secondary stores.
///
/// Only the primary is authoritative: its failure fails the call and
/// secondaries are skipped. Secondary failures are logged.
pub struct CompositeReportStore {
    primary: Arc<dyn ReportStore>,
    secondary: Vec<Arc<dyn ReportStore>>,
}

impl CompositeReportStore {
    pub fn new(primary: Arc<dyn ReportStore>) -> Self {
        Self {
            primary,
            secondary: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, store: Arc<dyn ReportStore>) -> Self {
        self.secondary.push(store);
        self
    }
}

#[async_trait]
impl ReportStore for CompositeReportStore {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    async fn persist(&self, report: &RunReport) -> Result<PersistedReport> {
        let persisted = self.primary.persist(report).await?;
        for store in &self.secondary {
            if let Err(e) = store.persist(report).await {
                warn!(store = store.name(), run_id = %report.run_id, error = %e, "Secondary report store failed");
            }
        }
        Ok(persisted)
    }
}
