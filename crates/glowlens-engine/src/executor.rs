use std::future::Future;
use std::time::Duration;

use crate::error::AnalysisError;

/// Races a unit of work against a deadline.
///
/// The work runs as its own task. When the deadline fires first the executor
/// stops waiting and reports `Timeout`; the task is left to finish on its own
/// and whatever it produces is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedExecutor {
    deadline: Duration,
}

impl BoundedExecutor {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub async fn run<T, Fut>(&self, work: Fut) -> Result<T, AnalysisError>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, AnalysisError>> + Send + 'static,
    {
        let handle = tokio::spawn(work);
        match tokio::time::timeout(self.deadline, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(AnalysisError::Provider(format!(
                "provider task did not complete: {join_err}"
            ))),
            Err(_) => Err(AnalysisError::Timeout {
                deadline: self.deadline,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::BoundedExecutor;
    use crate::error::AnalysisError;

    #[tokio::test(start_paused = true)]
    async fn returns_result_when_work_finishes_first() {
        let executor = BoundedExecutor::new(Duration::from_secs(3));
        let value = executor
            .run(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, AnalysisError>("done")
            })
            .await;
        assert_eq!(value, Ok("done"));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_on_work_that_never_resolves() {
        let executor = BoundedExecutor::new(Duration::from_secs(3));
        let started = tokio::time::Instant::now();
        let result = executor
            .run(std::future::pending::<Result<(), AnalysisError>>())
            .await;
        assert_eq!(
            result,
            Err(AnalysisError::Timeout {
                deadline: Duration::from_secs(3)
            })
        );
        assert!(started.elapsed() < Duration::from_millis(3_100));
    }

    #[tokio::test(start_paused = true)]
    async fn work_keeps_running_after_the_deadline() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let executor = BoundedExecutor::new(Duration::from_secs(1));
        let result = executor
            .run(async move {
                tokio::time::sleep(Duration::from_secs(4)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, AnalysisError>(())
            })
            .await;
        assert!(matches!(result, Err(AnalysisError::Timeout { .. })));
        assert!(!finished.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panicking_work_becomes_provider_error() {
        let executor = BoundedExecutor::new(Duration::from_secs(1));
        let result = executor
            .run(async {
                if true {
                    panic!("boom");
                }
                Ok::<_, AnalysisError>(())
            })
            .await;
        assert!(matches!(result, Err(AnalysisError::Provider(_))));
    }
}
