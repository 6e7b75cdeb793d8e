//! Per-call deadline for remote storage backends.

use std::future::Future;
use std::time::Duration;

use serde_json::json;

use crate::error::AppError;

/// Runs one storage call, failing with [`AppError::Storage`] once `limit` elapses.
///
/// `operation` names the call in logs and error details.
pub async fn with_deadline<T, F>(
    backend: &'static str,
    operation: &'static str,
    limit: Duration,
    call: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(backend, operation, timeout_ms = limit.as_millis() as u64, "Storage call timed out");
            Err(AppError::storage(
                "Storage operation timed out",
                json!({
                    "backend": backend,
                    "operation": operation,
                    "kind": "timeout",
                    "timeout_ms": limit.as_millis() as u64,
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let result = with_deadline("test", "get", Duration::from_secs(1), async {
            Ok::<_, AppError>(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<(), AppError> =
            with_deadline("test", "get", Duration::from_secs(1), async {
                Err(AppError::record_not_found("abc"))
            })
            .await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_becomes_storage_failure() {
        let result: Result<(), AppError> =
            with_deadline("test", "increment", Duration::from_millis(50), async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await;

        match result {
            Err(AppError::Storage { details, .. }) => {
                assert_eq!(details["kind"], "timeout");
                assert_eq!(details["operation"], "increment");
            }
            other => panic!("expected storage failure, got {other:?}"),
        }
    }
}
