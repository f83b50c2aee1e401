//! Notification sink port.
//!
//! Sinks receive the payload assembled at the end of a run. Delivery
//! failures are reported back so the caller can log them, but they never
//! affect report persistence.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::report::NotificationPayload;
use crate::error::NotificationError;

/// A destination for opportunity notifications.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `send` is awaited by the pipeline, so slow transports should apply
///   their own timeouts
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sink name for logging.
    fn name(&self) -> &'static str;

    /// Deliver one payload.
    async fn send(&self, payload: &NotificationPayload) -> Result<(), NotificationError>;
}

/// Outcome of broadcasting one payload to every registered sink.
#[derive(Debug, Default)]
pub struct Delivery {
    pub delivered: Vec<&'static str>,
    pub failed: Vec<NotificationError>,
}

impl Delivery {
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.delivered.is_empty() && !self.failed.is_empty()
    }
}

/// Registry of sinks (composite pattern).
///
/// Broadcasts payloads to all registered sinks, in registration order.
pub struct SinkRegistry {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl SinkRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { sinks: vec![] }
    }

    /// Register a sink.
    pub fn register(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Send to every sink. Failures are logged and collected, never raised.
    pub async fn send_all(&self, payload: &NotificationPayload) -> Delivery {
        let mut delivery = Delivery::default();
        for sink in &self.sinks {
            match sink.send(payload).await {
                Ok(()) => {
                    debug!(sink = sink.name(), entries = payload.entries.len(), "Notification delivered");
                    delivery.delivered.push(sink.name());
                }
                Err(e) => {
                    warn!(sink = sink.name(), error = %e, "Notification failed");
                    delivery.failed.push(e);
                }
            }
        }
        delivery
    }

    /// Number of registered sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A sink that discards payloads, for dry runs.
pub struct NullSink;

#[async_trait]
impl NotificationSink for NullSink {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn send(&self, _payload: &NotificationPayload) -> Result<(), NotificationError> {
        Ok(())
    }
}
