//! Call discipline shared by the research and judgment invokers.
//!
//! Every external call goes through the same three gates: the shared rate
//! limiter, a per-call timeout, and the retry policy.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::timeout;

use super::rate_limit::RateLimiter;
use super::retry::RetryPolicy;
use crate::error::CollaboratorError;

/// Concurrency, budget and retry settings for collaborator calls.
#[derive(Debug, Clone, Deserialize)]
pub struct InvokerConfig {
    /// Concurrent calls per stage.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Shared request budget; 0 disables rate limiting.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    /// Timeout applied to each individual attempt.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
    /// Deadline for all outstanding calls in one run.
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
    /// Total attempts per call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_parallelism() -> usize {
    4
}

const fn default_requests_per_minute() -> u32 {
    30
}

const fn default_call_timeout_secs() -> u64 {
    60
}

const fn default_run_timeout_secs() -> u64 {
    600
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_backoff_ms() -> u64 {
    1000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            requests_per_minute: default_requests_per_minute(),
            call_timeout_secs: default_call_timeout_secs(),
            run_timeout_secs: default_run_timeout_secs(),
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl InvokerConfig {
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_backoff: Duration::from_millis(self.base_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            ..RetryPolicy::default()
        }
    }

    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    #[must_use]
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

/// Rate limit, timeout and retry wrapped around one kind of call.
#[derive(Debug, Clone)]
pub struct CallGuard {
    policy: RetryPolicy,
    limiter: RateLimiter,
    call_timeout: Duration,
}

impl CallGuard {
    #[must_use]
    pub fn new(policy: RetryPolicy, limiter: RateLimiter, call_timeout: Duration) -> Self {
        Self {
            policy,
            limiter,
            call_timeout,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` under the guard. Each attempt waits for a rate-limit slot
    /// and is cut off after the call timeout.
    pub async fn call<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, CollaboratorError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CollaboratorError>>,
    {
        self.policy
            .run(label, |_| {
                let fut = op();
                async move {
                    self.limiter.acquire().await;
                    match timeout(self.call_timeout, fut).await {
                        Ok(result) => result,
                        Err(_) => Err(CollaboratorError::Timeout(self.call_timeout)),
                    }
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn guard(max_attempts: u32, call_timeout: Duration) -> CallGuard {
        let policy = RetryPolicy {
            max_attempts,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
            jitter: false,
            ..RetryPolicy::default()
        };
        CallGuard::new(policy, RateLimiter::unlimited(), call_timeout)
    }

    #[tokio::test]
    async fn slow_call_times_out_and_is_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = guard(2, Duration::from_millis(10))
            .call("slow", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(())
                }
            })
            .await;

        assert!(matches!(result, Err(CollaboratorError::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let result = guard(3, Duration::from_secs(1))
            .call("fast", || async { Ok::<_, CollaboratorError>(7) })
            .await;
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn config_builds_policy() {
        let config = InvokerConfig {
            max_attempts: 5,
            base_backoff_ms: 200,
            ..Default::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
    }
}
