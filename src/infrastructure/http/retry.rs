use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::domain::error::{AppError, Result};

/// Bounded attempts with a uniformly random wait between them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_wait: Duration, max_wait: Duration) -> Self {
        Self {
            max_attempts,
            min_wait,
            max_wait,
        }
    }

    /// Same attempt cap, no waiting. Used by tests against local servers.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    fn next_wait(&self) -> Duration {
        if self.max_wait <= self.min_wait {
            return self.min_wait;
        }
        rand::thread_rng().gen_range(self.min_wait..=self.max_wait)
    }
}

/// Run `operation` until it succeeds, fails with a non-transient error,
/// or runs out of attempts.
///
/// Exhausted retries surface as `ExtractionError`, which callers treat the
/// same way as a page that parsed but lacked the expected structure.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                if attempt >= max_attempts {
                    return Err(AppError::ExtractionError(format!(
                        "{} failed after {} attempts: {}",
                        label, max_attempts, e
                    )));
                }
                let wait = policy.next_wait();
                warn!(
                    operation = %label,
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
