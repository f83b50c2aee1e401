//! Notification sink that writes to the tracing log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::report::NotificationPayload;
use crate::error::NotificationError;
use crate::port::NotificationSink;

/// Emits one structured log line per notified opportunity.
///
/// Always registered, so every notification is visible in the logs even when
/// no chat integration is configured.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, payload: &NotificationPayload) -> Result<(), NotificationError> {
        info!(
            run_id = %payload.run_id,
            opportunities = payload.entries.len(),
            "Opportunities found"
        );
        for (rank, entry) in payload.entries.iter().enumerate() {
            info!(
                rank = rank + 1,
                market_id = %entry.market_id,
                decision = %entry.decision,
                edge = format!("{:.3}", entry.edge),
                score = format!("{:.3}", entry.score),
                confidence = %entry.confidence,
                title = %entry.title,
                url = %entry.url,
                "Opportunity"
            );
        }
        Ok(())
    }
}
