//! The row-source capability and its spreadsheet-backed implementation.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use sheets_api::types::Row;
use sheets_api::{Client, ValuesQuery};

/// Ordered rows of a range, each an ordered list of cell strings.
pub type Rows = Vec<Row>;

/// Anything that can read a fixed range of rows.
///
/// `quota_tag` is a fresh random token per physical call; the upstream uses
/// it to attribute quota, not to cache or deduplicate.
pub trait RowSource: Send + Sync {
    fn fetch_range(
        &self,
        range: &str,
        quota_tag: &str,
    ) -> impl Future<Output = Result<Rows, sheets_api::Error>> + Send;
}

/// A new quota tag (a random UUID v4).
pub fn new_quota_tag() -> String {
    uuid::Uuid::new_v4().to_string()
}

struct RetryConfig {
    max_retries: usize,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryConfig {
    fn from_env() -> Self {
        Self {
            max_retries: env_usize("CLUBSHEETS_RETRY_MAX", 3),
            base_delay_ms: env_u64("CLUBSHEETS_RETRY_BASE_MS", 500),
            max_delay_ms: env_u64("CLUBSHEETS_RETRY_MAX_MS", 8000),
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// [`RowSource`] over the spreadsheet values API, with exponential-backoff
/// retry on network errors, 429 and 5xx. Each retry is a new physical call
/// and carries a new quota tag.
pub struct SheetsRowSource {
    inner: Client,
    retry: RetryConfig,
}

impl SheetsRowSource {
    pub fn new(inner: Client) -> Self {
        Self {
            inner,
            retry: RetryConfig::from_env(),
        }
    }

    /// Replaces the retry policy read from the environment.
    pub fn with_retry(
        mut self,
        max_retries: usize,
        base_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        self.retry = RetryConfig {
            max_retries,
            base_delay_ms: base_delay.as_millis().try_into().unwrap_or(u64::MAX),
            max_delay_ms: max_delay.as_millis().try_into().unwrap_or(u64::MAX),
        };
        self
    }

    /// Disables retries; every failure is returned on the first attempt.
    pub fn without_retries(mut self) -> Self {
        self.retry.max_retries = 0;
        self
    }
}

impl RowSource for SheetsRowSource {
    async fn fetch_range(&self, range: &str, quota_tag: &str) -> Result<Rows, sheets_api::Error> {
        let query = ValuesQuery::default();
        let mut tag = quota_tag.to_string();
        let mut attempt = 0usize;
        loop {
            match self.inner.get_values(range, &tag, &query).await {
                Ok(value_range) => return Ok(value_range.values),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        range,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    tag = new_quota_tag();
                }
            }
        }
    }
}

fn is_retryable(err: &sheets_api::Error) -> bool {
    match err {
        sheets_api::Error::RequestFailed => true,
        sheets_api::Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_tags_are_fresh() {
        let a = new_quota_tag();
        let b = new_quota_tag();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn retryable_errors() {
        assert!(is_retryable(&sheets_api::Error::RequestFailed));
        assert!(is_retryable(&sheets_api::Error::HttpStatus {
            status: 429,
            body: String::new()
        }));
        assert!(is_retryable(&sheets_api::Error::HttpStatus {
            status: 503,
            body: String::new()
        }));
        assert!(!is_retryable(&sheets_api::Error::HttpStatus {
            status: 403,
            body: String::new()
        }));
    }

    #[test]
    fn explicit_retry_policy_overrides_env() {
        let client = Client::with_base_url("http://localhost:1", "s", "k").unwrap();
        let source = SheetsRowSource::new(client).with_retry(
            2,
            Duration::from_millis(10),
            Duration::from_millis(20),
        );
        assert_eq!(source.retry.max_retries, 2);
        assert_eq!(source.retry.base_delay_ms, 10);
        let delay = source.retry.delay_for_attempt(5);
        assert!(delay <= Duration::from_millis(24));
    }

    #[test]
    fn backoff_is_capped() {
        let cfg = RetryConfig {
            max_retries: 5,
            base_delay_ms: 500,
            max_delay_ms: 8000,
        };
        let first = cfg.delay_for_attempt(1);
        assert!(first >= Duration::from_millis(400) && first <= Duration::from_millis(600));
        let late = cfg.delay_for_attempt(20);
        assert!(late <= Duration::from_millis(9600));
    }
}
