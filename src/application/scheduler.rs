//! Interval scheduling for the pipeline.
//!
//! Each tick starts a fresh, independent run. A run that is still going when
//! another is requested causes the new request to be skipped, never queued.
//! Provider failures end the run, not the schedule.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use super::pipeline::{Pipeline, RunOutcome};
use crate::error::{Error, Result};

/// Counters for a scheduler session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Runs a pipeline on a fixed interval.
pub struct Scheduler {
    pipeline: Arc<Pipeline>,
    interval: Duration,
    running: Mutex<()>,
}

impl Scheduler {
    #[must_use]
    pub fn new(pipeline: Arc<Pipeline>, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            running: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the pipeline once unless a run is already in progress.
    ///
    /// # Errors
    ///
    /// [`Error::RunInProgress`] when another run holds the lock, otherwise
    /// whatever the run itself returns.
    pub async fn run_once(&self) -> Result<RunOutcome> {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("Pipeline run skipped: previous run still in progress");
            return Err(Error::RunInProgress);
        };
        self.pipeline.run().await
    }

    /// Run immediately, then on every interval tick until `shutdown` resolves.
    ///
    /// A run in flight when shutdown is requested is allowed to finish.
    pub async fn run_until<S>(&self, shutdown: S) -> ScheduleSummary
    where
        S: Future<Output = ()>,
    {
        let mut summary = ScheduleSummary::default();
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(interval_secs = self.interval.as_secs(), "Scheduler started");
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            match self.run_once().await {
                Ok(outcome) => {
                    summary.completed += 1;
                    info!(
                        opportunities = outcome.report.opportunities.len(),
                        next_in_secs = self.interval.as_secs(),
                        "Scheduled run finished"
                    );
                }
                Err(Error::RunInProgress) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(error = %e, "Scheduled run failed, retrying at next interval");
                }
            }
        }

        info!(
            completed = summary.completed,
            failed = summary.failed,
            skipped = summary.skipped,
            "Scheduler stopped"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::testkit::collaborator::{pipeline_with, StaticMarketProvider};
    use crate::testkit::domain::market;

    #[tokio::test]
    async fn overlapping_run_is_skipped() {
        let provider = StaticMarketProvider::new(vec![market("m", 0.5)]).with_delay(Duration::from_millis(100));
        let scheduler = Scheduler::new(Arc::new(pipeline_with(provider)), Duration::from_secs(3600));

        let (first, second) = tokio::join!(scheduler.run_once(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            scheduler.run_once().await
        });

        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::RunInProgress)));
    }

    #[tokio::test]
    async fn first_run_happens_immediately_and_failures_do_not_stop_schedule() {
        let provider = StaticMarketProvider::failing();
        let calls = provider.calls();
        let scheduler = Scheduler::new(Arc::new(pipeline_with(provider)), Duration::from_millis(20));

        let summary = scheduler
            .run_until(tokio::time::sleep(Duration::from_millis(70)))
            .await;

        assert!(summary.failed >= 2);
        assert_eq!(summary.completed, 0);
        assert_eq!(calls.load(Ordering::SeqCst), summary.failed);
    }
}
