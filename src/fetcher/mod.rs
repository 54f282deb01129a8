use async_trait::async_trait;
use anyhow::Result;
use crate::indicators::IndicatorId;
use crate::models::RawObservation;

pub mod fred;
pub mod function;
pub mod fallback;
pub mod series;
pub mod calendar;

/// An upstream provider of raw indicator observations.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    /// Returns at most `limit` recent observations. Order is not guaranteed;
    /// callers normalize before use.
    async fn fetch_data(&self, indicator: IndicatorId, limit: usize) -> Result<Vec<RawObservation>>;
}

/// Parses a FRED-style observation date ("2024-12-01").
pub(crate) fn parse_date(date_str: &str) -> Result<chrono::NaiveDate> {
    Ok(chrono::NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")?)
}
