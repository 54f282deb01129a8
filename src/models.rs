use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One upstream observation, ascending by date once normalized.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RawObservation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Display-normalized observation: one per period, unique label per series.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    /// Classifies a headline change. Undefined and exactly-zero changes are neutral.
    pub fn from_change(change: Option<f64>) -> Self {
        match change {
            Some(c) if c > 0.0 => Trend::Up,
            Some(c) if c < 0.0 => Trend::Down,
            _ => Trend::Neutral,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    pub value: f64,
    pub change: f64,
    pub mom_change: f64,
    pub yoy_change: f64,
    pub date: NaiveDate,
    pub trend: Trend,
}

/// Treasury maturity buckets, declared in canonical curve order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Maturity {
    #[serde(rename = "3M")]
    ThreeMonth,
    #[serde(rename = "6M")]
    SixMonth,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYear,
    #[serde(rename = "5Y")]
    FiveYear,
    #[serde(rename = "10Y")]
    TenYear,
    #[serde(rename = "30Y")]
    ThirtyYear,
}

impl Maturity {
    pub const ALL: [Maturity; 7] = [
        Maturity::ThreeMonth,
        Maturity::SixMonth,
        Maturity::OneYear,
        Maturity::TwoYear,
        Maturity::FiveYear,
        Maturity::TenYear,
        Maturity::ThirtyYear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Maturity::ThreeMonth => "3M",
            Maturity::SixMonth => "6M",
            Maturity::OneYear => "1Y",
            Maturity::TwoYear => "2Y",
            Maturity::FiveYear => "5Y",
            Maturity::TenYear => "10Y",
            Maturity::ThirtyYear => "30Y",
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct YieldCurvePoint {
    pub maturity: Maturity,
    #[serde(rename = "yield")]
    pub yield_pct: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FedEvent {
    pub title: String,
    #[serde(rename = "dateTimeISO")]
    pub date_time_iso: String,
    pub source: String,
}

/// Where a series came from. Fallback data carries the date its table entry was recorded.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataOrigin {
    Live,
    #[serde(rename_all = "camelCase")]
    Fallback { as_of: NaiveDate },
}

impl DataOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DataOrigin::Fallback { .. })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

/// Everything one indicator card needs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSeries {
    pub indicator: IndicatorSummary,
    pub time_series_data: Vec<TimeSeriesPoint>,
    pub trend_line: Vec<f64>,
    pub domain: Option<AxisDomain>,
    pub display: String,
    pub change_display: String,
    pub origin: DataOrigin,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YieldCurveData {
    pub points: Vec<YieldCurvePoint>,
    pub inverted: Option<bool>,
    pub domain: Option<AxisDomain>,
    pub origin: DataOrigin,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadingIndicators {
    pub yield_curve: YieldCurveData,
    pub treasury_spread: IndicatorSeries,
    pub housing_starts: IndicatorSeries,
    pub pmi: IndicatorSeries,
    pub money_supply: IndicatorSeries,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaggingIndicators {
    pub unemployment: IndicatorSeries,
    pub inflation: IndicatorSeries,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_from_change() {
        assert_eq!(Trend::from_change(Some(0.3)), Trend::Up);
        assert_eq!(Trend::from_change(Some(-0.1)), Trend::Down);
        assert_eq!(Trend::from_change(Some(0.0)), Trend::Neutral);
        assert_eq!(Trend::from_change(None), Trend::Neutral);
    }

    #[test]
    fn test_summary_field_names() {
        let summary = IndicatorSummary {
            value: 4.1,
            change: 0.0,
            mom_change: 0.0,
            yoy_change: -2.3,
            date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            trend: Trend::Neutral,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["momChange"], 0.0);
        assert_eq!(json["yoyChange"], -2.3);
        assert_eq!(json["date"], "2024-12-01");
        assert_eq!(json["trend"], "neutral");
    }

    #[test]
    fn test_yield_point_serializes_keyword_field() {
        let point = YieldCurvePoint { maturity: Maturity::TenYear, yield_pct: 4.5 };
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["maturity"], "10Y");
        assert_eq!(json["yield"], 4.5);
    }

    #[test]
    fn test_fed_event_field_names() {
        let event = FedEvent {
            title: "Speech - Chair Jerome H. Powell".to_string(),
            date_time_iso: "2025-08-22T10:00:00-04:00".to_string(),
            source: "test".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["dateTimeISO"], "2025-08-22T10:00:00-04:00");
    }

    #[test]
    fn test_origin_serialization() {
        let origin = DataOrigin::Fallback { as_of: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap() };
        let json = serde_json::to_value(origin).unwrap();
        assert_eq!(json["kind"], "fallback");
        assert_eq!(json["asOf"], "2024-12-31");
        assert!(!DataOrigin::Live.is_fallback());
    }
}
