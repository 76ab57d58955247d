use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Fixed-delay retry. Every error is retried the same way; on exhaustion the
/// last error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Upper bound on time spent in delays between attempts.
    pub fn total_delay(&self) -> Duration {
        self.delay * self.max_retries
    }

    /// Runs `op` with 1-based attempt numbers until it succeeds or the attempt
    /// budget is spent. `on_failure` sees every failed attempt.
    pub async fn run<T, E, F, Fut>(
        &self,
        label: &str,
        mut on_failure: impl FnMut(u32, &E),
        mut op: F,
    ) -> Result<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    warn!(
                        label,
                        attempt,
                        max_attempts,
                        error = %err,
                        "attempt failed"
                    );
                    on_failure(attempt, &err);
                    if attempt >= max_attempts {
                        return Err(err);
                    }
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RetryPolicy;

    #[test]
    fn defaults_allow_three_attempts_one_second_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay, Duration::from_secs(1));
        assert_eq!(policy.total_delay(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let policy = RetryPolicy::default();
        let mut failures = Vec::new();
        let result = policy
            .run(
                "test",
                |attempt, err: &String| failures.push((attempt, err.clone())),
                |attempt| async move {
                    if attempt < 3 {
                        Err(format!("failure {attempt}"))
                    } else {
                        Ok(attempt)
                    }
                },
            )
            .await;
        assert_eq!(result, Ok(3));
        assert_eq!(
            failures,
            vec![(1, "failure 1".to_string()), (2, "failure 2".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn surfaces_the_last_error_on_exhaustion() {
        let policy = RetryPolicy::new(2, Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        let mut calls = 0;
        let result: Result<(), String> = policy
            .run(
                "test",
                |_, _| {},
                |attempt| {
                    calls += 1;
                    async move { Err(format!("failure {attempt}")) }
                },
            )
            .await;
        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls, 3);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(1_000));
        assert!(waited < Duration::from_millis(1_100));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_single_attempt() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        let mut calls = 0;
        let result: Result<(), &str> = policy
            .run(
                "test",
                |_, _| {},
                |_| {
                    calls += 1;
                    async { Err("nope") }
                },
            )
            .await;
        assert_eq!(result, Err("nope"));
        assert_eq!(calls, 1);
    }
}
