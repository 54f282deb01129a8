use std::collections::HashMap;

use chrono::NaiveDate;

use crate::indicators::IndicatorId;
use crate::models::RawObservation;

/// A static series used when the upstream source is unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackSeries {
    /// Date the values were last checked against the upstream release.
    pub as_of: NaiveDate,
    pub observations: Vec<RawObservation>,
}

/// All fallback series, keyed by indicator.
#[derive(Debug, Clone, Default)]
pub struct FallbackTable {
    entries: HashMap<IndicatorId, FallbackSeries>,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// First-of-month dates from `start` (year, month), one per value, as FRED dates monthly series.
fn monthly(start: (i32, u32), values: &[f64]) -> Vec<RawObservation> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let months = start.1 as i32 - 1 + i as i32;
            let year = start.0 + months.div_euclid(12);
            let month = months.rem_euclid(12) as u32 + 1;
            RawObservation { date: date(year, month, 1), value: *value }
        })
        .collect()
}

impl FallbackTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The shipped table. Monthly series carry values in upstream units so a
    /// fallback card renders exactly like a live one.
    pub fn builtin() -> Self {
        let as_of = date(2024, 12, 31);
        let mut table = Self::empty();

        table.insert(IndicatorId::TreasurySpread, as_of, vec![
            RawObservation { date: date(2024, 7, 31), value: -0.20 },
            RawObservation { date: date(2024, 8, 30), value: -0.02 },
            RawObservation { date: date(2024, 9, 30), value: 0.14 },
            RawObservation { date: date(2024, 10, 31), value: 0.12 },
            RawObservation { date: date(2024, 11, 29), value: 0.05 },
            RawObservation { date: date(2024, 12, 31), value: 0.33 },
        ]);
        table.insert(IndicatorId::HousingStarts, as_of,
            monthly((2024, 7), &[1280.0, 1295.0, 1311.0, 1329.0, 1350.0, 1365.0]));
        table.insert(IndicatorId::Pmi, as_of,
            monthly((2024, 7), &[46.8, 47.2, 47.9, 48.1, 48.4, 49.3]));
        table.insert(IndicatorId::MoneySupply, as_of, monthly((2023, 12), &[
            20760.0, 20780.0, 20770.0, 20840.0, 20870.0, 20960.0, 21030.0,
            21060.0, 21180.0, 21250.0, 21320.0, 21450.0, 21530.0,
        ]));
        table.insert(IndicatorId::Unemployment, as_of,
            monthly((2024, 7), &[4.3, 4.2, 4.1, 4.1, 4.1, 4.1]));
        table.insert(IndicatorId::Inflation, as_of, monthly((2023, 12), &[
            308.742, 309.685, 311.054, 312.230, 313.207, 313.225, 313.049,
            313.534, 314.121, 314.686, 315.454, 316.441, 317.603,
        ]));

        let curve = [
            (IndicatorId::Yield3M, 4.2),
            (IndicatorId::Yield6M, 4.1),
            (IndicatorId::Yield1Y, 4.0),
            (IndicatorId::Yield2Y, 4.0),
            (IndicatorId::Yield5Y, 4.2),
            (IndicatorId::Yield10Y, 4.5),
            (IndicatorId::Yield30Y, 4.7),
        ];
        for (id, value) in curve {
            table.insert(id, as_of, vec![RawObservation { date: as_of, value }]);
        }

        table
    }

    pub fn insert(&mut self, id: IndicatorId, as_of: NaiveDate, observations: Vec<RawObservation>) {
        self.entries.insert(id, FallbackSeries { as_of, observations });
    }

    pub fn remove(&mut self, id: IndicatorId) -> Option<FallbackSeries> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: IndicatorId) -> Option<&FallbackSeries> {
        self.entries.get(&id)
    }

    /// Indicators with no usable fallback entry.
    pub fn missing(&self) -> Vec<IndicatorId> {
        IndicatorId::ALL
            .iter()
            .copied()
            .filter(|id| self.get(*id).map_or(true, |s| s.observations.is_empty()))
            .collect()
    }
}
