// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Retry logic for completion backend calls with exponential backoff
//!
//! Cancellation is not a failure: a fired token short-circuits the loop
//! immediately, including during the backoff sleep.

use crate::config::settings::ResilienceConfig;
use crate::error::{ApiError, QuillError, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Retry configuration with smart defaults
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay in milliseconds (exponentially increased)
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds
    pub max_delay_ms: u64,
    /// Jitter percentage (0.0 to 1.0)
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        // Use ResilienceConfig defaults for consistency
        let resilience = ResilienceConfig::default();
        Self::from(resilience)
    }
}

impl From<ResilienceConfig> for RetryConfig {
    fn from(config: ResilienceConfig) -> Self {
        Self::from(&config)
    }
}

impl From<&ResilienceConfig> for RetryConfig {
    fn from(config: &ResilienceConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
            jitter: config.jitter,
        }
    }
}

impl RetryConfig {
    /// Calculate delay for a given attempt number
    fn calculate_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: base * 2^attempt
        let exponential_ms = self.base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
        let capped_ms = exponential_ms.min(self.max_delay_ms);

        // Add jitter
        let jitter_range = (capped_ms as f64 * self.jitter) as i64;
        let jitter_ms = if jitter_range == 0 {
            0
        } else {
            rand::rng().random_range(-jitter_range..=jitter_range)
        };

        let final_ms = (capped_ms as i64 + jitter_ms).max(0) as u64;
        Duration::from_millis(final_ms)
    }
}

/// Determine if an error is retryable
pub fn is_retryable(error: &QuillError) -> bool {
    match error {
        QuillError::Api(api_error) => match api_error {
            // Retry on transient failures
            ApiError::Network(_) => true,
            ApiError::RateLimited(_) => true,
            ApiError::Timeout => true,
            ApiError::ServerError { status, .. } => {
                // Retry on 5xx errors
                *status >= 500 && *status < 600
            }

            // Don't retry on client errors
            ApiError::AuthenticationFailed => false,
            ApiError::ModelNotFound(_) => false,
            ApiError::ContextTooLong { .. } => false,
            ApiError::InvalidResponse(_) => false,
        },
        // Cancellation is an outcome, never a failure to recover from
        QuillError::Cancelled => false,
        _ => false,
    }
}

/// Retry a failable async operation with exponential backoff
///
/// # Arguments
/// * `operation` - The async operation to retry
/// * `config` - Retry configuration (uses default if None)
/// * `cancel` - Cancellation token observed between attempts
/// * `operation_name` - Name of the operation for logging
///
/// # Returns
/// Result of the operation after retries. A cancelled operation resolves to
/// `QuillError::Cancelled` without consuming further attempts.
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    config: Option<RetryConfig>,
    cancel: &CancellationToken,
    operation_name: &str,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let config = config.unwrap_or_default();
    let mut attempt = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(QuillError::Cancelled);
        }

        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::info!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        "operation succeeded after retries"
                    );
                }
                return Ok(result);
            }
            Err(QuillError::Cancelled) => {
                tracing::debug!(operation = operation_name, "operation cancelled");
                return Err(QuillError::Cancelled);
            }
            Err(error) => {
                if !is_retryable(&error) {
                    tracing::warn!(
                        operation = operation_name,
                        error = %error,
                        "non-retryable error"
                    );
                    return Err(error);
                }

                if attempt >= config.max_retries {
                    tracing::warn!(
                        operation = operation_name,
                        retries = config.max_retries,
                        "exhausted all retries"
                    );
                    return Err(error);
                }

                let delay = config.calculate_delay(attempt);
                tracing::warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    error = %error,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after transient failure"
                );

                // The backoff sleep races the token so a cancellation that
                // lands between attempts does not start another one.
                tokio::select! {
                    _ = cancel.cancelled() => return Err(QuillError::Cancelled),
                    _ = sleep(delay) => {}
                }
                attempt += 1;
            }
        }
    }
}
