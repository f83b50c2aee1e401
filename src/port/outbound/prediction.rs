//! Judgment history port.

use async_trait::async_trait;

use crate::domain::prediction::PredictionRecord;
use crate::error::Result;

/// Append-only log of every judged market.
#[async_trait]
pub trait PredictionLog: Send + Sync {
    /// Store one run's records. Existing records are never changed.
    async fn record(&self, predictions: &[PredictionRecord]) -> Result<()>;
}

/// Read side of the judgment history.
pub trait PredictionReader: Send + Sync {
    /// Most recent records, newest first.
    fn recent_predictions(&self, limit: usize) -> Result<Vec<PredictionRecord>>;
}
