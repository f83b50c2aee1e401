use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::LogSink;
use crate::domain::id::RunId;
use crate::domain::report::NotificationPayload;
use crate::error::NotificationError;
use crate::port::{NotificationSink, NullSink, SinkRegistry};

struct CountingSink {
    count: Arc<AtomicUsize>,
}

#[async_trait]
impl NotificationSink for CountingSink {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn send(&self, _payload: &NotificationPayload) -> Result<(), NotificationError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct BrokenSink;

#[async_trait]
impl NotificationSink for BrokenSink {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn send(&self, _payload: &NotificationPayload) -> Result<(), NotificationError> {
        Err(NotificationError::new("broken", "chat not found"))
    }
}

fn payload() -> NotificationPayload {
    NotificationPayload {
        run_id: RunId::new(),
        run_at: Utc::now(),
        entries: vec![],
    }
}

#[tokio::test]
async fn registry_sends_to_all_sinks() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut registry = SinkRegistry::new();
    registry.register(Box::new(CountingSink { count: count.clone() }));
    registry.register(Box::new(CountingSink { count: count.clone() }));

    let delivery = registry.send_all(&payload()).await;

    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(delivery.delivered, vec!["counting", "counting"]);
    assert!(delivery.failed.is_empty());
}

#[tokio::test]
async fn failing_sink_does_not_block_the_others() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut registry = SinkRegistry::new();
    registry.register(Box::new(BrokenSink));
    registry.register(Box::new(CountingSink { count: count.clone() }));

    let delivery = registry.send_all(&payload()).await;

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(delivery.failed.len(), 1);
    assert_eq!(delivery.failed[0].sink, "broken");
    assert!(!delivery.all_failed());
}

#[tokio::test]
async fn null_and_log_sinks_accept_payloads() {
    assert!(NullSink.send(&payload()).await.is_ok());
    assert!(LogSink.send(&payload()).await.is_ok());
}

#[test]
fn registry_len_and_is_empty() {
    let mut registry = SinkRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);

    registry.register(Box::new(NullSink));
    assert!(!registry.is_empty());
    assert_eq!(registry.len(), 1);
}
