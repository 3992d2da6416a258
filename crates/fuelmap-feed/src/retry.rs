//! Retry with exponential back-off and jitter for feed downloads.
//!
//! [`retry_with_backoff`] wraps a fallible async fetch and retries transient
//! failures (timeouts, connection errors, 5xx, 429). Anything else is
//! returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::FeedError;

/// Upper bound for a single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`FeedError::Http`] when the request timed out, failed to connect, or
///   the body was cut off mid-transfer.
/// - [`FeedError::UnexpectedStatus`] for 5xx and 429.
///
/// **Not retriable:** 404, other 4xx, invalid URLs, CSV and I/O errors.
pub(crate) fn is_retriable(err: &FeedError) -> bool {
    match err {
        FeedError::Http(e) => e.is_timeout() || e.is_connect() || e.is_body(),
        FeedError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
        FeedError::NotFound { .. }
        | FeedError::InvalidUrl { .. }
        | FeedError::Csv { .. }
        | FeedError::EmptyFeed { .. }
        | FeedError::Io { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt        |
/// |---------|----------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter     |
/// | 3       | 1 000 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 30 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, FeedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FeedError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient feed error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
