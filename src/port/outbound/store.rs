//! Persistence port for the seen-market record.

use async_trait::async_trait;

use crate::domain::{id::MarketId, judgment::Decision, seen::SeenMarket};
use crate::error::Result;

/// Durable record of which market+decision pairs were already reported.
///
/// Only one pipeline instance writes at a time; implementations need not
/// coordinate concurrent writers.
#[async_trait]
pub trait SeenMarketStore: Send + Sync {
    /// Last report of `market_id` with `decision`, if any.
    async fn get(&self, market_id: &MarketId, decision: Decision) -> Result<Option<SeenMarket>>;

    /// Insert or replace the entry for the pair.
    async fn upsert(&self, seen: &SeenMarket) -> Result<()>;
}
