//! Market listing port.

use async_trait::async_trait;

use crate::domain::market::MarketRecord;
use crate::error::Result;

/// Source of raw market listings.
///
/// Failures should surface as [`Error::Provider`](crate::error::Error::Provider);
/// the pipeline treats them as fatal to the current run.
#[async_trait]
pub trait MarketProvider: Send + Sync {
    /// Venue name for logging.
    fn name(&self) -> &'static str;

    /// Fetch up to `limit` listed markets.
    async fn list_markets(&self, limit: usize) -> Result<Vec<MarketRecord>>;
}
