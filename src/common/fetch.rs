//! Bounded store calls.
//!
//! The store itself has no timeout layer; every round-trip that feeds a view
//! is capped by `Config::request_timeout` and an unresolved call counts as a
//! failure.

use super::errors::{BusinessError, BusinessResult};
use std::future::Future;
use std::time::Duration;

/// Runs `fut` under `limit`, mapping an elapsed timer to `BusinessError::Timeout`
pub async fn bounded<T, F>(operation: &str, limit: Duration, fut: F) -> BusinessResult<T>
where
    F: Future<Output = BusinessResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(BusinessError::Timeout {
            operation: operation.to_string(),
        }),
    }
}

/// Like [`bounded`], but degrades any failure to `T::default()` so a
/// composed view stays renderable
pub async fn fail_soft<T, F>(operation: &str, limit: Duration, fut: F) -> T
where
    T: Default,
    F: Future<Output = BusinessResult<T>>,
{
    match bounded(operation, limit, fut).await {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("{operation} failed, using empty default: {err}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result: BusinessResult<u32> = bounded("slow_read", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        })
        .await;

        assert_eq!(
            result,
            Err(BusinessError::Timeout {
                operation: "slow_read".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_fail_soft_returns_default_on_error() {
        let value: Vec<u32> = fail_soft("list_plots", Duration::from_secs(1), async {
            Err(BusinessError::InternalError {
                message: "boom".to_string(),
            })
        })
        .await;
        assert!(value.is_empty());

        let value: Vec<u32> =
            fail_soft("list_plots", Duration::from_secs(1), async { Ok(vec![3, 4]) }).await;
        assert_eq!(value, vec![3, 4]);
    }
}
