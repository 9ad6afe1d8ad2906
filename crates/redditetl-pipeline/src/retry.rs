//! Whole-run retry with a fixed delay.
//!
//! A failed run is re-executed from scratch; stages are never retried
//! individually. [`is_retriable`] decides which failures are worth another
//! attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::{ClientError, PipelineError, StorageError};

/// How many extra attempts a run gets and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, delay_secs: u64) -> Self {
        Self {
            max_retries,
            delay: Duration::from_secs(delay_secs),
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }
}

/// Returns `true` for failures that another attempt might get past.
///
/// **Retriable:** network and upstream failures, auth rejections (tokens and
/// credentials rotate), storage write failures, local-copy I/O.
///
/// **Not retriable:** malformed requests, missing or forbidden subreddits,
/// schema errors, and storage misconfiguration. Retrying these only repeats
/// the failure.
#[must_use]
pub fn is_retriable(err: &PipelineError) -> bool {
    match err {
        PipelineError::Client(client) => !matches!(
            client,
            ClientError::InvalidRequest(_)
                | ClientError::NotFound { .. }
                | ClientError::Forbidden { .. }
        ),
        PipelineError::Schema(_) => false,
        PipelineError::Storage(storage) => matches!(storage, StorageError::Put { .. }),
        PipelineError::LocalCopy { .. } => true,
    }
}

/// Runs `operation` up to `1 + policy.max_retries` times.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-retriable error immediately.
pub async fn run_with_retries<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, PipelineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_secs = policy.delay.as_secs(),
                    error = %err,
                    "pipeline run failed; retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
