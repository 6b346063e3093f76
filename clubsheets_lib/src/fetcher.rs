//! Cache-through fetcher for one dataset's raw rows.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::cache::RangeCache;
use crate::config::DatasetSettings;
use crate::dataset::Dataset;
use crate::error::UpstreamError;
use crate::source::{new_quota_tag, RowSource, Rows};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

type FetchResult = Result<Arc<Rows>, UpstreamError>;
type InFlight = Shared<BoxFuture<'static, FetchResult>>;

enum Attach {
    Cached(Arc<Rows>),
    Wait(InFlight),
}

/// Reads one dataset's fixed range, serving from the shared [`RangeCache`]
/// while the entry is live and going to the [`RowSource`] on a miss.
///
/// With single-flight on (the default), concurrent misses attach to the
/// first caller's upstream fetch and all receive its outcome, failures
/// included. With it off, every concurrent miss makes its own upstream call.
pub struct RawDatasetFetcher<S> {
    upstream: Upstream<S>,
    single_flight: bool,
    in_flight: Mutex<Option<InFlight>>,
}

/// Everything one upstream call needs, owned so the call can outlive the
/// caller that started it.
struct Upstream<S> {
    dataset: Dataset,
    range: String,
    ttl: Duration,
    timeout: Duration,
    source: Arc<S>,
    cache: Arc<RangeCache>,
}

impl<S> Clone for Upstream<S> {
    fn clone(&self) -> Self {
        Self {
            dataset: self.dataset,
            range: self.range.clone(),
            ttl: self.ttl,
            timeout: self.timeout,
            source: Arc::clone(&self.source),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S: RowSource + 'static> RawDatasetFetcher<S> {
    pub fn new(
        dataset: Dataset,
        settings: &DatasetSettings,
        source: Arc<S>,
        cache: Arc<RangeCache>,
    ) -> Self {
        Self {
            upstream: Upstream {
                dataset,
                range: settings.range.clone(),
                ttl: settings.ttl,
                timeout: DEFAULT_TIMEOUT,
                source,
                cache,
            },
            single_flight: true,
            in_flight: Mutex::new(None),
        }
    }

    /// Bounds each upstream fetch; an overrun becomes [`UpstreamError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.upstream.timeout = timeout;
        self
    }

    pub fn with_single_flight(mut self, single_flight: bool) -> Self {
        self.single_flight = single_flight;
        self
    }

    pub fn dataset(&self) -> Dataset {
        self.upstream.dataset
    }

    pub fn range(&self) -> &str {
        &self.upstream.range
    }

    /// Cached rows, if any are live. Never calls upstream.
    pub fn cached(&self) -> Option<Arc<Rows>> {
        self.upstream.cached()
    }

    /// Forgets the cached rows so the next fetch goes upstream.
    pub fn invalidate(&self) {
        self.upstream
            .cache
            .invalidate(self.upstream.dataset.cache_key());
    }

    /// Returns the dataset's rows, from cache when live.
    ///
    /// An `Err` means the dataset is unavailable right now; it is never
    /// turned into an empty result.
    pub async fn fetch(&self) -> FetchResult {
        if let Some(rows) = self.cached() {
            tracing::debug!("{} cache hit ({} rows)", self.dataset(), rows.len());
            return Ok(rows);
        }

        if !self.single_flight {
            return self.upstream.clone().fetch().await;
        }

        match self.attach() {
            Attach::Cached(rows) => Ok(rows),
            Attach::Wait(call) => call.await,
        }
    }

    /// The pending upstream call to wait on, starting one if none is
    /// pending. Short-circuits with rows a just-finished call has cached.
    fn attach(&self) -> Attach {
        let mut slot = match self.in_flight.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(call) = slot.as_ref() {
            if call.peek().is_none() {
                tracing::debug!("{} joining in-flight fetch", self.dataset());
                return Attach::Wait(call.clone());
            }
        }
        if let Some(rows) = self.cached() {
            return Attach::Cached(rows);
        }
        let call = self.upstream.clone().fetch().boxed().shared();
        *slot = Some(call.clone());
        Attach::Wait(call)
    }
}

impl<S: RowSource + 'static> Upstream<S> {
    fn cached(&self) -> Option<Arc<Rows>> {
        self.cache.get(self.dataset.cache_key())
    }

    async fn fetch(self) -> FetchResult {
        tracing::debug!("{} cache miss, fetching {}", self.dataset, self.range);
        let quota_tag = new_quota_tag();
        let call = self.source.fetch_range(&self.range, &quota_tag);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(rows)) => {
                let rows = Arc::new(rows);
                self.cache
                    .put(self.dataset.cache_key(), Arc::clone(&rows), self.ttl);
                tracing::debug!(
                    "{} cached {} rows for {}s",
                    self.dataset,
                    rows.len(),
                    self.ttl.as_secs()
                );
                Ok(rows)
            }
            Ok(Err(source)) => {
                tracing::error!("Failed to retrieve {} from spreadsheet: {}", self.dataset, source);
                Err(UpstreamError::Source {
                    dataset: self.dataset,
                    source,
                })
            }
            Err(_) => {
                tracing::error!(
                    "Retrieving {} from spreadsheet timed out after {:.1}s",
                    self.dataset,
                    self.timeout.as_secs_f64()
                );
                Err(UpstreamError::Timeout {
                    dataset: self.dataset,
                    timeout: self.timeout,
                })
            }
        }
    }
}
