use crate::error::AppError;
use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Retry an async operation with exponential backoff (100ms, 200ms, 400ms...).
///
/// Only failures that carry a retryable [`AppError`] are retried; anything
/// else (transport errors included) is returned immediately.
pub async fn with_retry<F, Fut, T>(operation: F, max_retries: u32) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_retries && is_retryable(&e) => {
                let backoff_ms = 2_u64.pow(attempt) * 100;
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries,
                    backoff_ms,
                    error = %e,
                    "catalog call failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                attempt += 1;
            }
            Err(e) => {
                if attempt > 0 {
                    tracing::warn!(attempts = attempt + 1, "catalog call gave up");
                }
                return Err(e);
            }
        }
    }
}

fn is_retryable(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<AppError>()
        .is_some_and(AppError::is_retryable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_succeeds_on_first_attempt() {
        let result = with_retry(|| async { Ok::<i32, anyhow::Error>(42) }, 3).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_rate_limit() {
        let counter = Arc::new(AtomicU32::new(0));

        let result = with_retry(
            || {
                let counter = counter.clone();
                async move {
                    let count = counter.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(AppError::Catalog { status: 429 }.into())
                    } else {
                        Ok(42)
                    }
                }
            },
            3,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let result: Result<i32> = with_retry(
            || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::Catalog { status: 503 }.into())
                }
            },
            2,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let result: Result<i32> = with_retry(
            || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::Catalog { status: 404 }.into())
                }
            },
            3,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
