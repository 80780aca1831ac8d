//! Retry with exponential back-off and jitter for the generative-text client.
//!
//! Only transient failures are retried: rate limiting, 5xx responses, and
//! transport errors (timeout, connection refused). Everything else is
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::EnrichError;

pub(crate) fn is_retriable(err: &EnrichError) -> bool {
    match err {
        EnrichError::RateLimited { .. } => true,
        EnrichError::UnexpectedStatus { status, .. } => *status >= 500,
        EnrichError::Http(e) => e.is_timeout() || e.is_connect(),
        EnrichError::Deserialize { .. }
        | EnrichError::EmptyCompletion
        | EnrichError::InvalidResponse(_)
        | EnrichError::InvalidUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The delay before retry `n` is `backoff_base_ms × 2ⁿ⁻¹`, scaled by a
/// ±25 % jitter and capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, EnrichError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EnrichError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
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
                    "generative-text transient error; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
