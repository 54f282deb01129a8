pub mod chart;
pub mod format;
pub mod metrics;

use crate::core::timeseries::to_points;
use crate::error::{DashboardError, Result};
use crate::indicators::registry::IndicatorMetadata;
use crate::models::{DataOrigin, IndicatorSeries, RawObservation};

/// Turns one normalized series into everything its card displays.
pub fn build_series(
    meta: &IndicatorMetadata,
    observations: &[RawObservation],
    origin: DataOrigin,
) -> Result<IndicatorSeries> {
    let latest = observations
        .last()
        .ok_or_else(|| DashboardError::EmptySeries(meta.id.to_string()))?;

    let points = to_points(observations, meta.frequency);
    let indicator = metrics::summarize(meta, &points, latest.date)?;

    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let trend_line = chart::moving_average(&values, chart::TREND_WINDOW);
    let domain = chart::axis_domain(&values, &meta.domain);

    Ok(IndicatorSeries {
        display: format::format_value(meta.unit, indicator.value),
        change_display: format::format_change(meta.basis, indicator.change),
        indicator,
        time_series_data: points,
        trend_line,
        domain,
        origin,
    })
}
