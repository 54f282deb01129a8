use once_cell::sync::Lazy;
use serde::Serialize;

use super::IndicatorId;

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Group {
    Leading,
    Lagging,
    /// Inputs to another indicator (yield curve maturities), never a card of their own.
    Component,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Frequency {
    Daily,
    Monthly,
}

/// Defines how the indicator value should be formatted/displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitType {
    /// Percentage (e.g., 4.1 -> "4.1%")
    Percent,
    /// Percentage points shown as basis points (e.g., 0.5 -> "+50 bps")
    Spread,
    /// Raw value as-is (e.g., PMI 49.3, CPI 315.6)
    Index,
    /// Already in Thousands of units from source (e.g., HOUST 1350 -> "1.35M")
    Thousands,
    /// Already in Billions of dollars from source (e.g., M2SL 21450 -> "$21.5T")
    Billions,
}

/// How a delta between two observations is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeBasis {
    /// `(latest - previous) / previous * 100`
    Percent,
    /// `latest - previous`, for index-style series
    Points,
}

/// Which delta a card surfaces as its headline `change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadlineMetric {
    MonthOverMonth,
    YearOverYear,
}

/// Axis padding for a chart: `[min - pad, max + pad]` with `pad = max(range * pad_ratio, min_pad)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainRule {
    pub pad_ratio: f64,
    pub min_pad: f64,
    /// A threshold the domain must always contain (PMI 50).
    pub include: Option<f64>,
    /// Lower clamp for the domain (rates cannot go below zero on the chart).
    pub floor: Option<f64>,
}

impl DomainRule {
    pub const fn ratio(pad_ratio: f64) -> Self {
        Self { pad_ratio, min_pad: 0.0, include: None, floor: None }
    }

    pub const fn with_min_pad(mut self, min_pad: f64) -> Self {
        self.min_pad = min_pad;
        self
    }

    pub const fn including(mut self, threshold: f64) -> Self {
        self.include = Some(threshold);
        self
    }

    pub const fn floored_at(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }
}

pub const YIELD_CURVE_DOMAIN: DomainRule = DomainRule::ratio(0.0).with_min_pad(0.2);

// ============================================================================
// METADATA STRUCT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorMetadata {
    pub id: IndicatorId,
    pub name: String,
    pub description: String,
    /// Upstream (FRED) series identifier.
    pub series_id: String,
    pub group: Group,
    pub frequency: Frequency,
    pub unit: UnitType,
    pub basis: ChangeBasis,
    pub headline: HeadlineMetric,
    /// Overrides the configured observation window when set.
    pub window: Option<usize>,
    pub domain: DomainRule,
    /// Value MoM/YoY resolve to when they are undefined.
    pub default_change: f64,
}

impl IndicatorMetadata {
    pub fn window_or(&self, default: usize) -> usize {
        self.window.unwrap_or(default)
    }
}

// Helper macro to reduce boilerplate
macro_rules! ind {
    ($id:expr, $name:expr, $desc:expr, $series:expr, $group:expr, $freq:expr, $unit:expr, $basis:expr, $headline:expr, $window:expr, $domain:expr) => {
        IndicatorMetadata {
            id: $id,
            name: $name.to_string(),
            description: $desc.to_string(),
            series_id: $series.to_string(),
            group: $group,
            frequency: $freq,
            unit: $unit,
            basis: $basis,
            headline: $headline,
            window: $window,
            domain: $domain,
            default_change: 0.0,
        }
    };
}

// ============================================================================
// STATIC INDICATOR REGISTRY (laid out in IndicatorId::ALL order)
// ============================================================================

use ChangeBasis::*;
use Frequency::*;
use Group::*;
use HeadlineMetric::*;

static INDICATORS: Lazy<Vec<IndicatorMetadata>> = Lazy::new(|| {
    vec![
        ind!(IndicatorId::TreasurySpread, "Treasury Yield Curve", "10-Year minus 2-Year Treasury spread. Negative = inverted curve",
             "T10Y2Y", Leading, Daily, UnitType::Spread, Points, MonthOverMonth, None,
             DomainRule::ratio(0.10).with_min_pad(0.1)),
        ind!(IndicatorId::HousingStarts, "New Housing Starts", "New privately-owned housing units started, annual rate (SAAR)",
             "HOUST", Leading, Monthly, UnitType::Thousands, Percent, MonthOverMonth, None,
             DomainRule::ratio(0.05)),
        ind!(IndicatorId::Pmi, "Purchasing Manager's Index", "ISM Manufacturing PMI. Below 50 = contraction",
             "NAPM", Leading, Monthly, UnitType::Index, Points, MonthOverMonth, None,
             DomainRule::ratio(0.05).with_min_pad(1.0).including(50.0)),
        ind!(IndicatorId::MoneySupply, "Money Supply (M2)", "M2 money stock. Headline is year-over-year growth",
             "M2SL", Leading, Monthly, UnitType::Billions, Percent, YearOverYear, Some(13),
             DomainRule::ratio(0.02)),
        ind!(IndicatorId::Unemployment, "Unemployment Rate", "Civilian unemployment rate",
             "UNRATE", Lagging, Monthly, UnitType::Percent, Percent, MonthOverMonth, None,
             DomainRule::ratio(0.10).with_min_pad(0.2).floored_at(0.0)),
        ind!(IndicatorId::Inflation, "Inflation (CPI)", "Consumer Price Index for All Urban Consumers",
             "CPIAUCSL", Lagging, Monthly, UnitType::Index, Percent, MonthOverMonth, Some(13),
             DomainRule::ratio(0.10).floored_at(0.0)),
        ind!(IndicatorId::Yield3M, "3-Month Treasury", "3-Month Treasury constant maturity rate",
             "DGS3MO", Component, Daily, UnitType::Percent, Points, MonthOverMonth, None, YIELD_CURVE_DOMAIN),
        ind!(IndicatorId::Yield6M, "6-Month Treasury", "6-Month Treasury constant maturity rate",
             "DGS6MO", Component, Daily, UnitType::Percent, Points, MonthOverMonth, None, YIELD_CURVE_DOMAIN),
        ind!(IndicatorId::Yield1Y, "1-Year Treasury", "1-Year Treasury constant maturity rate",
             "DGS1", Component, Daily, UnitType::Percent, Points, MonthOverMonth, None, YIELD_CURVE_DOMAIN),
        ind!(IndicatorId::Yield2Y, "2-Year Treasury", "2-Year Treasury constant maturity rate",
             "DGS2", Component, Daily, UnitType::Percent, Points, MonthOverMonth, None, YIELD_CURVE_DOMAIN),
        ind!(IndicatorId::Yield5Y, "5-Year Treasury", "5-Year Treasury constant maturity rate",
             "DGS5", Component, Daily, UnitType::Percent, Points, MonthOverMonth, None, YIELD_CURVE_DOMAIN),
        ind!(IndicatorId::Yield10Y, "10-Year Treasury", "10-Year Treasury constant maturity rate",
             "DGS10", Component, Daily, UnitType::Percent, Points, MonthOverMonth, None, YIELD_CURVE_DOMAIN),
        ind!(IndicatorId::Yield30Y, "30-Year Treasury", "30-Year Treasury constant maturity rate",
             "DGS30", Component, Daily, UnitType::Percent, Points, MonthOverMonth, None, YIELD_CURVE_DOMAIN),
    ]
});

pub struct Registry;

impl Registry {
    pub fn metadata(id: IndicatorId) -> &'static IndicatorMetadata {
        &INDICATORS[id.index()]
    }

    pub fn get_available_indicators() -> &'static [IndicatorMetadata] {
        &INDICATORS
    }

    pub fn by_group(group: Group) -> impl Iterator<Item = &'static IndicatorMetadata> {
        INDICATORS.iter().filter(move |m| m.group == group)
    }
}
