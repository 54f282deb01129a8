use crate::error::DashboardError;
use crate::models::Maturity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod registry;
pub mod yield_curve;

/// The fixed set of indicators the dashboard knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndicatorId {
    TreasurySpread,
    HousingStarts,
    Pmi,
    MoneySupply,
    Unemployment,
    Inflation,
    #[serde(rename = "yield-3m")]
    Yield3M,
    #[serde(rename = "yield-6m")]
    Yield6M,
    #[serde(rename = "yield-1y")]
    Yield1Y,
    #[serde(rename = "yield-2y")]
    Yield2Y,
    #[serde(rename = "yield-5y")]
    Yield5Y,
    #[serde(rename = "yield-10y")]
    Yield10Y,
    #[serde(rename = "yield-30y")]
    Yield30Y,
}

impl IndicatorId {
    pub const ALL: [IndicatorId; 13] = [
        IndicatorId::TreasurySpread,
        IndicatorId::HousingStarts,
        IndicatorId::Pmi,
        IndicatorId::MoneySupply,
        IndicatorId::Unemployment,
        IndicatorId::Inflation,
        IndicatorId::Yield3M,
        IndicatorId::Yield6M,
        IndicatorId::Yield1Y,
        IndicatorId::Yield2Y,
        IndicatorId::Yield5Y,
        IndicatorId::Yield10Y,
        IndicatorId::Yield30Y,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorId::TreasurySpread => "treasury-spread",
            IndicatorId::HousingStarts => "housing-starts",
            IndicatorId::Pmi => "pmi",
            IndicatorId::MoneySupply => "money-supply",
            IndicatorId::Unemployment => "unemployment",
            IndicatorId::Inflation => "inflation",
            IndicatorId::Yield3M => "yield-3m",
            IndicatorId::Yield6M => "yield-6m",
            IndicatorId::Yield1Y => "yield-1y",
            IndicatorId::Yield2Y => "yield-2y",
            IndicatorId::Yield5Y => "yield-5y",
            IndicatorId::Yield10Y => "yield-10y",
            IndicatorId::Yield30Y => "yield-30y",
        }
    }

    /// Position in `ALL`; the registry table is laid out in the same order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn for_maturity(maturity: Maturity) -> Self {
        match maturity {
            Maturity::ThreeMonth => IndicatorId::Yield3M,
            Maturity::SixMonth => IndicatorId::Yield6M,
            Maturity::OneYear => IndicatorId::Yield1Y,
            Maturity::TwoYear => IndicatorId::Yield2Y,
            Maturity::FiveYear => IndicatorId::Yield5Y,
            Maturity::TenYear => IndicatorId::Yield10Y,
            Maturity::ThirtyYear => IndicatorId::Yield30Y,
        }
    }

    pub fn maturity(&self) -> Option<Maturity> {
        match self {
            IndicatorId::Yield3M => Some(Maturity::ThreeMonth),
            IndicatorId::Yield6M => Some(Maturity::SixMonth),
            IndicatorId::Yield1Y => Some(Maturity::OneYear),
            IndicatorId::Yield2Y => Some(Maturity::TwoYear),
            IndicatorId::Yield5Y => Some(Maturity::FiveYear),
            IndicatorId::Yield10Y => Some(Maturity::TenYear),
            IndicatorId::Yield30Y => Some(Maturity::ThirtyYear),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndicatorId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DashboardError::UnknownIndicator(s.to_string()))
    }
}
