use crate::indicators::registry::Frequency;
use crate::models::{RawObservation, TimeSeriesPoint};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Cleans an upstream series: drops non-finite values, sorts ascending,
/// keeps the last value per date and trims to the most recent `limit` periods.
pub fn normalize_observations(raw: impl IntoIterator<Item = RawObservation>, limit: usize) -> Vec<RawObservation> {
    // BTreeMap gives ascending order and last-write-wins per date in one pass.
    let by_date: BTreeMap<NaiveDate, f64> = raw
        .into_iter()
        .filter(|obs| obs.value.is_finite())
        .map(|obs| (obs.date, obs.value))
        .collect();

    let skip = by_date.len().saturating_sub(limit);
    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, value)| RawObservation { date, value })
        .collect()
}

/// Short period label for a chart axis.
pub fn period_label(date: NaiveDate, frequency: Frequency) -> String {
    match frequency {
        Frequency::Monthly => date.format("%b %y").to_string(),
        Frequency::Daily => date.format("%b %d").to_string(),
    }
}

/// Maps ascending observations to display points, one per label.
/// When two observations share a label the later one replaces the earlier.
pub fn to_points(observations: &[RawObservation], frequency: Frequency) -> Vec<TimeSeriesPoint> {
    let mut points: Vec<TimeSeriesPoint> = Vec::with_capacity(observations.len());
    for obs in observations {
        let label = period_label(obs.date, frequency);
        match points.iter_mut().find(|p| p.label == label) {
            Some(existing) => existing.value = obs.value,
            None => points.push(TimeSeriesPoint { label, value: obs.value }),
        }
    }
    points
}
