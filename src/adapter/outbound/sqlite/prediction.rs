//! SQLite judgment history.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::{NewPredictionRow, PredictionRow};
use super::database::schema::predictions;
use crate::domain::id::{MarketId, RunId};
use crate::domain::prediction::PredictionRecord;
use crate::error::{Error, Result};
use crate::port::{PredictionLog, PredictionReader};

/// SQLite-backed [`PredictionLog`] and [`PredictionReader`].
pub struct SqlitePredictionLog {
    pool: DbPool,
}

impl SqlitePredictionLog {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(record: &PredictionRecord) -> NewPredictionRow {
        NewPredictionRow {
            run_id: record.run_id.to_string(),
            market_id: record.market_id.to_string(),
            title: record.title.clone(),
            recorded_at: record.recorded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            implied_probability: record.implied_probability,
            estimated_probability: record.estimated_probability,
            decision: record.decision.to_string(),
            confidence: record.confidence.to_string().to_ascii_lowercase(),
            outcome: record.outcome.to_string(),
            rationale: record.rationale.clone(),
            research_excerpt: record.research_excerpt.clone(),
        }
    }

    fn from_row(row: PredictionRow) -> Result<PredictionRecord> {
        let recorded_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.recorded_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);
        Ok(PredictionRecord {
            run_id: RunId::from(row.run_id),
            market_id: MarketId::from(row.market_id),
            title: row.title,
            recorded_at,
            implied_probability: row.implied_probability,
            estimated_probability: row.estimated_probability,
            decision: row.decision.parse().map_err(Error::Parse)?,
            confidence: row.confidence.parse().map_err(Error::Parse)?,
            outcome: row.outcome.parse().map_err(Error::Parse)?,
            rationale: row.rationale,
            research_excerpt: row.research_excerpt,
        })
    }
}

#[async_trait]
impl PredictionLog for SqlitePredictionLog {
    async fn record(&self, records: &[PredictionRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let rows: Vec<NewPredictionRow> = records.iter().map(Self::to_row).collect();
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for row in &rows {
                diesel::insert_into(predictions::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok(())
        })
        .map_err(|e| Error::Database(e.to_string()))
    }
}

impl PredictionReader for SqlitePredictionLog {
    fn recent_predictions(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<PredictionRow> = predictions::table
            .order((predictions::recorded_at.desc(), predictions::id.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(PredictionRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use crate::domain::judgment::{Confidence, Decision, Judgment};
    use crate::domain::market::MarketRecord;
    use crate::domain::prediction::PredictionOutcome;

    fn record(run_id: &RunId, id: &str, outcome: PredictionOutcome, at: DateTime<Utc>) -> PredictionRecord {
        let market = MarketRecord::new(id, format!("Market {id}"), 5_000.0, 900.0, 0.40);
        let judgment = Judgment::try_new(Decision::Yes, 0.52, Confidence::Medium, "thin edge").unwrap();
        PredictionRecord::new(run_id.clone(), &market, &judgment, outcome, at)
    }

    #[tokio::test]
    async fn records_read_back_newest_first() {
        let log = SqlitePredictionLog::new(open(":memory:").unwrap());
        let earlier = Utc::now() - Duration::hours(6);
        let later = Utc::now();
        let first_run = RunId::new();
        let second_run = RunId::new();

        log.record(&[record(&first_run, "a", PredictionOutcome::Reported, earlier)])
            .await
            .unwrap();
        log.record(&[
            record(&second_run, "a", PredictionOutcome::Suppressed, later),
            record(&second_run, "b", PredictionOutcome::BelowThreshold, later)
                .with_research("notes"),
        ])
        .await
        .unwrap();

        let history = log.recent_predictions(10).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].run_id, first_run);
        assert_eq!(history[2].outcome, PredictionOutcome::Reported);
        assert!(history[..2].iter().all(|r| r.run_id == second_run));

        let b = history.iter().find(|r| r.market_id.as_str() == "b").unwrap();
        assert_eq!(b.research_excerpt.as_deref(), Some("notes"));
        assert_eq!(b.confidence, Confidence::Medium);
        assert!((b.estimated_probability - 0.52).abs() < 1e-9);
    }

    #[tokio::test]
    async fn one_row_per_market_per_run() {
        let log = SqlitePredictionLog::new(open(":memory:").unwrap());
        let run = RunId::new();
        let at = Utc::now();
        log.record(&[record(&run, "a", PredictionOutcome::Reported, at)])
            .await
            .unwrap();

        let duplicate = log
            .record(&[
                record(&run, "b", PredictionOutcome::Abstained, at),
                record(&run, "a", PredictionOutcome::Reported, at),
            ])
            .await;

        assert!(matches!(duplicate, Err(Error::Database(_))));
        assert_eq!(log.recent_predictions(10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let log = SqlitePredictionLog::new(open(":memory:").unwrap());
        log.record(&[]).await.unwrap();
        assert!(log.recent_predictions(5).unwrap().is_empty());
    }
}
