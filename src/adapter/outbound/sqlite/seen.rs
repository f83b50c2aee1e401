//! SQLite seen-market store.
//!
//! Persists the cooldown record so that suppression survives restarts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::SeenMarketRow;
use super::database::schema::seen_markets;
use crate::domain::{id::MarketId, judgment::Decision, seen::SeenMarket};
use crate::error::{Error, Result};
use crate::port::SeenMarketStore;

/// SQLite-backed [`SeenMarketStore`].
pub struct SqliteSeenStore {
    pool: DbPool,
}

impl SqliteSeenStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(seen: &SeenMarket) -> SeenMarketRow {
        SeenMarketRow {
            market_id: seen.market_id.to_string(),
            decision: seen.decision.to_string(),
            reported_at: seen.reported_at.to_rfc3339(),
        }
    }

    fn from_row(row: SeenMarketRow) -> Result<SeenMarket> {
        let decision: Decision = row.decision.parse().map_err(Error::Parse)?;
        let reported_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.reported_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);
        Ok(SeenMarket::new(MarketId::from(row.market_id), decision, reported_at))
    }
}

#[async_trait]
impl SeenMarketStore for SqliteSeenStore {
    async fn get(&self, market_id: &MarketId, decision: Decision) -> Result<Option<SeenMarket>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<SeenMarketRow> = seen_markets::table
            .find((market_id.as_str(), decision.as_str()))
            .select(SeenMarketRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    async fn upsert(&self, seen: &SeenMarket) -> Result<()> {
        let row = Self::to_row(seen);
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::replace_into(seen_markets::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}
