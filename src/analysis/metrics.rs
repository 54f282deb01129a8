use chrono::NaiveDate;

use crate::error::{DashboardError, Result};
use crate::indicators::registry::{ChangeBasis, HeadlineMetric, IndicatorMetadata};
use crate::models::{IndicatorSummary, TimeSeriesPoint, Trend};

/// Periods between the latest point and its year-ago comparison (monthly series).
pub const YOY_LAG: usize = 12;

/// Delta from `previous` to `latest`. `None` when a percent change would divide by zero.
pub fn change_between(latest: f64, previous: f64, basis: ChangeBasis) -> Option<f64> {
    let change = match basis {
        ChangeBasis::Points => latest - previous,
        ChangeBasis::Percent => {
            if previous == 0.0 {
                return None;
            }
            (latest - previous) / previous * 100.0
        }
    };
    change.is_finite().then_some(change)
}

/// Latest point against the one immediately before it.
pub fn mom_change(values: &[f64], basis: ChangeBasis) -> Option<f64> {
    match values {
        [.., previous, latest] => change_between(*latest, *previous, basis),
        _ => None,
    }
}

/// Latest point against the point `YOY_LAG` periods earlier.
///
/// A 12-point window (what the hosted function returns) compares against its
/// oldest point. Fewer than 12 points falls back to MoM.
pub fn yoy_change(values: &[f64], basis: ChangeBasis) -> Option<f64> {
    if values.len() < YOY_LAG {
        return mom_change(values, basis);
    }
    let latest = values.len() - 1;
    let year_ago = latest - YOY_LAG.min(latest);
    change_between(values[latest], values[year_ago], basis)
}

/// MoM and YoY before default resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeMetrics {
    pub mom: Option<f64>,
    pub yoy: Option<f64>,
}

impl ChangeMetrics {
    pub fn compute(values: &[f64], basis: ChangeBasis) -> Self {
        Self {
            mom: mom_change(values, basis),
            yoy: yoy_change(values, basis),
        }
    }

    pub fn headline(&self, metric: HeadlineMetric) -> Option<f64> {
        match metric {
            HeadlineMetric::MonthOverMonth => self.mom,
            HeadlineMetric::YearOverYear => self.yoy,
        }
    }
}

/// Builds the card summary for one ascending series.
///
/// `date` is the date of the latest observation. The trend follows the sign of the
/// indicator's headline metric, so it is neutral whenever that metric is undefined.
pub fn summarize(meta: &IndicatorMetadata, points: &[TimeSeriesPoint], date: NaiveDate) -> Result<IndicatorSummary> {
    let latest = points
        .last()
        .ok_or_else(|| DashboardError::EmptySeries(meta.id.to_string()))?;

    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let metrics = ChangeMetrics::compute(&values, meta.basis);
    let headline = metrics.headline(meta.headline);

    Ok(IndicatorSummary {
        value: latest.value,
        change: headline.unwrap_or(meta.default_change),
        mom_change: metrics.mom.unwrap_or(meta.default_change),
        yoy_change: metrics.yoy.unwrap_or(meta.default_change),
        date,
        trend: Trend::from_change(headline),
    })
}
