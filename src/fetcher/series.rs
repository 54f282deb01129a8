use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::fallback::FallbackTable;
use super::DataSource;
use crate::core::retry::Backoff;
use crate::core::timeseries::normalize_observations;
use crate::error::{DashboardError, Result};
use crate::indicators::registry::Registry;
use crate::indicators::IndicatorId;
use crate::models::{DataOrigin, RawObservation};

/// A normalized series plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSeries {
    pub indicator: IndicatorId,
    pub observations: Vec<RawObservation>,
    pub origin: DataOrigin,
}

/// Fetches one indicator with timeout and retry, falling back to the static table.
pub struct SeriesFetcher {
    source: Arc<dyn DataSource>,
    fallback: FallbackTable,
    default_limit: usize,
    timeout: Duration,
    backoff: Backoff,
}

impl SeriesFetcher {
    pub fn new(source: Arc<dyn DataSource>, fallback: FallbackTable) -> Self {
        Self {
            source,
            fallback,
            default_limit: 12,
            timeout: Duration::from_secs(10),
            backoff: Backoff::new(Duration::from_millis(500), 1),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Window size for `id`: the registry override or the configured default.
    pub fn limit_for(&self, id: IndicatorId) -> usize {
        Registry::metadata(id).window_or(self.default_limit)
    }

    /// Live data when the source answers, fallback data otherwise.
    ///
    /// The only error is an indicator with no fallback entry, which means the
    /// table itself is broken.
    pub async fn fetch(&self, id: IndicatorId) -> Result<FetchedSeries> {
        let limit = self.limit_for(id);

        match self.fetch_live(id, limit).await {
            Ok(observations) => {
                debug!(indicator = %id, points = observations.len(), "Live series fetched");
                Ok(FetchedSeries { indicator: id, observations, origin: DataOrigin::Live })
            }
            Err(e) => {
                warn!(indicator = %id, source = self.source.name(), error = %e, "Upstream unavailable, using fallback series");
                self.fallback_series(id, limit)
            }
        }
    }

    async fn fetch_live(&self, id: IndicatorId, limit: usize) -> Result<Vec<RawObservation>> {
        let mut last_error = String::new();

        for attempt in 0..self.backoff.attempts() {
            if attempt > 0 {
                self.backoff.wait(attempt).await;
                info!(indicator = %id, attempt = attempt + 1, "Retrying upstream fetch");
            }

            let outcome = tokio::time::timeout(self.timeout, self.source.fetch_data(id, limit)).await;
            match outcome {
                Ok(Ok(raw)) => {
                    let observations = normalize_observations(raw, limit);
                    if !observations.is_empty() {
                        return Ok(observations);
                    }
                    last_error = "upstream returned no usable observations".to_string();
                }
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => last_error = format!("timed out after {:?}", self.timeout),
            }
            debug!(indicator = %id, attempt = attempt + 1, error = %last_error, "Upstream attempt failed");
        }

        Err(DashboardError::Upstream { indicator: id.to_string(), message: last_error })
    }

    fn fallback_series(&self, id: IndicatorId, limit: usize) -> Result<FetchedSeries> {
        let entry = self
            .fallback
            .get(id)
            .ok_or_else(|| DashboardError::MissingFallback(id.to_string()))?;

        Ok(FetchedSeries {
            indicator: id,
            observations: normalize_observations(entry.observations.iter().copied(), limit),
            origin: DataOrigin::Fallback { as_of: entry.as_of },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        failures_before_success: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DataSource for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch_data(&self, _indicator: IndicatorId, _limit: usize) -> anyhow::Result<Vec<RawObservation>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                anyhow::bail!("transient failure {}", call);
            }
            Ok(vec![
                RawObservation { date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(), value: 50.1 },
                RawObservation { date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), value: 49.2 },
            ])
        }
    }

    struct Hanging;

    #[async_trait]
    impl DataSource for Hanging {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn fetch_data(&self, _indicator: IndicatorId, _limit: usize) -> anyhow::Result<Vec<RawObservation>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![])
        }
    }

    fn scripted(failures: usize) -> Arc<Scripted> {
        Arc::new(Scripted { failures_before_success: failures, calls: AtomicUsize::new(0) })
    }

    #[tokio::test]
    async fn test_live_series_is_normalized() {
        let fetcher = SeriesFetcher::new(scripted(0), FallbackTable::builtin()).with_backoff(Backoff::none());
        let series = fetcher.fetch(IndicatorId::Pmi).await.unwrap();
        assert_eq!(series.origin, DataOrigin::Live);
        assert_eq!(series.observations[0].value, 49.2);
        assert_eq!(series.observations[1].value, 50.1);
    }

    #[tokio::test]
    async fn test_retry_recovers_transient_failure() {
        let source = scripted(1);
        let fetcher = SeriesFetcher::new(source.clone(), FallbackTable::builtin())
            .with_backoff(Backoff::new(Duration::ZERO, 1));
        let series = fetcher.fetch(IndicatorId::Pmi).await.unwrap();
        assert_eq!(series.origin, DataOrigin::Live);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_fall_back() {
        let source = scripted(usize::MAX);
        let fetcher = SeriesFetcher::new(source.clone(), FallbackTable::builtin())
            .with_backoff(Backoff::new(Duration::ZERO, 2));
        let series = fetcher.fetch(IndicatorId::Pmi).await.unwrap();
        assert!(series.origin.is_fallback());
        assert_eq!(series.observations.last().unwrap().value, 49.3);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let fetcher = SeriesFetcher::new(Arc::new(Hanging), FallbackTable::builtin())
            .with_timeout(Duration::from_millis(20))
            .with_backoff(Backoff::none());
        let series = fetcher.fetch(IndicatorId::Unemployment).await.unwrap();
        assert!(series.origin.is_fallback());
    }

    #[tokio::test]
    async fn test_missing_fallback_is_an_error() {
        let fetcher = SeriesFetcher::new(scripted(usize::MAX), FallbackTable::empty()).with_backoff(Backoff::none());
        let err = fetcher.fetch(IndicatorId::Pmi).await.unwrap_err();
        assert!(matches!(err, DashboardError::MissingFallback(_)));
    }

    #[test]
    fn test_limit_uses_registry_override() {
        let fetcher = SeriesFetcher::new(scripted(0), FallbackTable::builtin()).with_limit(6);
        assert_eq!(fetcher.limit_for(IndicatorId::Pmi), 6);
        assert_eq!(fetcher.limit_for(IndicatorId::MoneySupply), 13);
    }
}
