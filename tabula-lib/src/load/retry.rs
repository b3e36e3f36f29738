//! Retry configuration for progressive fetches.

use std::time::Duration;

use super::FetchOutcome;
use super::PageFetcher;

/// Configuration for retrying failed page fetches.
///
/// The default performs no retries: the first failure ends progressive
/// loading. With retries enabled, a failed fetch is repeated after a delay
/// that doubles each attempt, capped at `max_delay`. Empty pages are never
/// retried.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tabula_lib::load::RetryConfig;
///
/// // Default: fail closed
/// let config = RetryConfig::default();
/// assert_eq!(config.max_retries, 0);
///
/// // Custom configuration
/// let custom = RetryConfig::default()
///     .max_retries(3)
///     .initial_delay(Duration::from_millis(200))
///     .max_delay(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first failure.
    pub max_retries: u32,
    /// Initial delay between retries (doubles each attempt).
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::no_retry()
    }
}

impl RetryConfig {
    /// Creates a config with retries disabled.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the initial delay between retries.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }
}

/// Fetches `page`, retrying failures according to `retry`.
///
/// Returns the first non-failure outcome, or the last failure once the
/// retries are used up.
pub async fn fetch_with_retry<F>(fetcher: &F, page: usize, retry: &RetryConfig) -> FetchOutcome
where
    F: PageFetcher + ?Sized,
{
    let mut attempts = 0;
    let mut delay = retry.initial_delay;

    loop {
        match fetcher.fetch_page(page).await {
            FetchOutcome::Failed(err) if attempts < retry.max_retries => {
                log::warn!(
                    "Fetching page {} failed (attempt {} of {}): {}",
                    page,
                    attempts + 1,
                    retry.max_retries + 1,
                    err
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(retry.max_delay);
                attempts += 1;
            }
            outcome => return outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::error::FetchError;
    use crate::load::fetch_fn_sync;
    use crate::model::Row;

    #[tokio::test]
    async fn test_no_retry_returns_first_failure() {
        let calls = AtomicUsize::new(0);
        let fetcher = fetch_fn_sync(|page| {
            calls.fetch_add(1, Ordering::SeqCst);
            FetchOutcome::Failed(FetchError::failed(page, "down"))
        });

        let outcome = fetch_with_retry(&fetcher, 2, &RetryConfig::no_retry()).await;
        assert!(outcome.is_failed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let calls = AtomicUsize::new(0);
        let fetcher = fetch_fn_sync(|page| {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                FetchOutcome::Failed(FetchError::failed(page, "flaky"))
            } else {
                FetchOutcome::Rows(vec![Row::new().set("id", 1)])
            }
        });
        let retry = RetryConfig::default()
            .max_retries(3)
            .initial_delay(Duration::from_millis(1));

        let outcome = fetch_with_retry(&fetcher, 2, &retry).await;
        assert!(matches!(outcome, FetchOutcome::Rows(ref rows) if rows.len() == 1));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_builder() {
        let config = RetryConfig::no_retry()
            .max_retries(2)
            .max_delay(Duration::from_secs(1));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.max_delay, Duration::from_secs(1));
    }
}
