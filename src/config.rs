use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use tracing::info;

use crate::core::orchestrator::IndicatorService;
use crate::core::retry::Backoff;
use crate::error::{DashboardError, Result};
use crate::fetcher::calendar::FedCalendarFetcher;
use crate::fetcher::fallback::FallbackTable;
use crate::fetcher::fred::FredSource;
use crate::fetcher::function::FunctionSource;
use crate::fetcher::series::SeriesFetcher;
use crate::fetcher::DataSource;

pub const DEFAULT_CALENDAR_URL: &str = "https://r.jina.ai/http://www.federalreserve.gov/newsevents/calendar.htm";
pub const DEFAULT_SPEAKER_PATTERN: &str = r"Jerome\s+H\.\s+Powell|Chair\s+Powell";

const RETRY_BASE: Duration = Duration::from_millis(500);

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub function_url: Option<String>,
    pub function_key: Option<String>,
    pub fred_api_key: Option<String>,
    pub observation_limit: usize,
    pub timeout: Duration,
    pub max_retries: u32,
    pub calendar_url: String,
    pub speaker_pattern: Regex,
    pub fallback_event: Option<DateTime<Utc>>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // Missing .env is fine; real env vars still apply
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let observation_limit: usize = parse_or(get("DASHBOARD_OBSERVATION_LIMIT"), "DASHBOARD_OBSERVATION_LIMIT", 12)?;
        if observation_limit == 0 {
            return Err(DashboardError::Config("DASHBOARD_OBSERVATION_LIMIT must be at least 1".into()));
        }
        let timeout_secs: u64 = parse_or(get("DASHBOARD_TIMEOUT_SECS"), "DASHBOARD_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(DashboardError::Config("DASHBOARD_TIMEOUT_SECS must be at least 1".into()));
        }
        let max_retries: u32 = parse_or(get("DASHBOARD_MAX_RETRIES"), "DASHBOARD_MAX_RETRIES", 1)?;

        let pattern_src = get("FED_SPEAKER_PATTERN").unwrap_or_else(|| DEFAULT_SPEAKER_PATTERN.to_string());
        let speaker_pattern = Regex::new(&format!("(?i){}", pattern_src))
            .map_err(|e| DashboardError::Config(format!("FED_SPEAKER_PATTERN: {}", e)))?;

        let fallback_event = get("FED_FALLBACK_EVENT")
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| DashboardError::Config(format!("FED_FALLBACK_EVENT '{}': {}", raw, e)))
            })
            .transpose()?;

        Ok(Self {
            function_url: get("DASHBOARD_FUNCTION_URL"),
            function_key: get("DASHBOARD_FUNCTION_KEY"),
            fred_api_key: get("FRED_API_KEY"),
            observation_limit,
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
            calendar_url: get("FED_CALENDAR_URL").unwrap_or_else(|| DEFAULT_CALENDAR_URL.to_string()),
            speaker_pattern,
            fallback_event,
        })
    }

    /// The function endpoint when configured, FRED direct otherwise.
    pub fn build_source(&self) -> Result<Arc<dyn DataSource>> {
        if let Some(url) = &self.function_url {
            info!(url = %url, "Using economic-data function");
            let source = FunctionSource::new(url.clone(), self.function_key.as_deref(), self.timeout)
                .map_err(|e| DashboardError::Config(format!("function client: {}", e)))?;
            return Ok(Arc::new(source));
        }

        let key = self.fred_api_key.clone().ok_or_else(|| {
            DashboardError::Config("set DASHBOARD_FUNCTION_URL or FRED_API_KEY".into())
        })?;
        info!(key_len = key.len(), "Using FRED directly");
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("http client: {}", e)))?;
        Ok(Arc::new(FredSource::new(key, client)))
    }

    pub fn build_service(&self) -> Result<IndicatorService> {
        let fetcher = SeriesFetcher::new(self.build_source()?, FallbackTable::builtin())
            .with_limit(self.observation_limit)
            .with_timeout(self.timeout)
            .with_backoff(Backoff::new(RETRY_BASE, self.max_retries));
        Ok(IndicatorService::new(fetcher))
    }

    pub fn calendar_fetcher(&self) -> Result<FedCalendarFetcher> {
        FedCalendarFetcher::new(self.calendar_url.clone(), self.speaker_pattern.clone(), self.timeout)
            .map_err(|e| DashboardError::Config(format!("calendar client: {}", e)))
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|e| DashboardError::Config(format!("{} '{}': {}", key, v, e))),
    }
}
