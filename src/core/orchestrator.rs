use chrono::Utc;
use futures::future::join_all;
use tracing::info;

use crate::analysis::{build_series, chart};
use crate::error::{DashboardError, Result};
use crate::fetcher::series::SeriesFetcher;
use crate::indicators::registry::{Registry, YIELD_CURVE_DOMAIN};
use crate::indicators::yield_curve::{canonical_order, is_inverted};
use crate::indicators::IndicatorId;
use crate::models::{
    DataOrigin, IndicatorSeries, LaggingIndicators, LeadingIndicators, Maturity, YieldCurveData, YieldCurvePoint,
};

/// Fetches and derives every dashboard indicator. Constructed explicitly so
/// callers and tests choose the data source and fallback table.
pub struct IndicatorService {
    fetcher: SeriesFetcher,
}

impl IndicatorService {
    pub fn new(fetcher: SeriesFetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &SeriesFetcher {
        &self.fetcher
    }

    /// One card: fetch (with fallback), normalize, derive.
    pub async fn get_indicator(&self, id: IndicatorId) -> Result<IndicatorSeries> {
        let meta = Registry::metadata(id);
        let fetched = self.fetcher.fetch(id).await?;
        build_series(meta, &fetched.observations, fetched.origin)
    }

    /// Latest yield at every maturity, fetched concurrently and returned in canonical order.
    pub async fn get_yield_curve(&self) -> Result<YieldCurveData> {
        let fetches = Maturity::ALL.map(|m| self.fetcher.fetch(IndicatorId::for_maturity(m)));
        let results = join_all(fetches).await;

        let mut points = Vec::with_capacity(Maturity::ALL.len());
        let mut oldest_fallback = None;

        // join_all preserves issue order, so results line up with Maturity::ALL
        for (maturity, result) in Maturity::ALL.iter().zip(results) {
            let series = result?;
            if let DataOrigin::Fallback { as_of } = series.origin {
                oldest_fallback = Some(oldest_fallback.map_or(as_of, |d: chrono::NaiveDate| d.min(as_of)));
            }
            if let Some(latest) = series.observations.last() {
                points.push(YieldCurvePoint { maturity: *maturity, yield_pct: latest.value });
            }
        }

        let points = canonical_order(points);
        let values: Vec<f64> = points.iter().map(|p| p.yield_pct).collect();

        Ok(YieldCurveData {
            inverted: is_inverted(&points),
            domain: chart::axis_domain(&values, &YIELD_CURVE_DOMAIN),
            origin: oldest_fallback.map_or(DataOrigin::Live, |as_of| DataOrigin::Fallback { as_of }),
            points,
        })
    }

    /// Yield curve, treasury spread, housing starts, PMI and money supply, fetched as one batch.
    pub async fn get_all_leading_indicators(&self) -> Result<LeadingIndicators> {
        let (yield_curve, treasury_spread, housing_starts, pmi, money_supply) = tokio::join!(
            self.get_yield_curve(),
            self.get_indicator(IndicatorId::TreasurySpread),
            self.get_indicator(IndicatorId::HousingStarts),
            self.get_indicator(IndicatorId::Pmi),
            self.get_indicator(IndicatorId::MoneySupply),
        );

        let leading = (|| {
            Ok::<_, DashboardError>(LeadingIndicators {
                yield_curve: yield_curve?,
                treasury_spread: treasury_spread?,
                housing_starts: housing_starts?,
                pmi: pmi?,
                money_supply: money_supply?,
                last_updated: Utc::now(),
            })
        })()
        .map_err(|e| DashboardError::Aggregate { group: "leading", source: Box::new(e) })?;

        info!(
            fallbacks = count_fallbacks(&[
                leading.yield_curve.origin,
                leading.treasury_spread.origin,
                leading.housing_starts.origin,
                leading.pmi.origin,
                leading.money_supply.origin,
            ]),
            "Leading indicators refreshed"
        );
        Ok(leading)
    }

    /// Unemployment and inflation, fetched as one batch.
    pub async fn get_all_lagging_indicators(&self) -> Result<LaggingIndicators> {
        let (unemployment, inflation) = tokio::join!(
            self.get_indicator(IndicatorId::Unemployment),
            self.get_indicator(IndicatorId::Inflation),
        );

        let lagging = (|| {
            Ok::<_, DashboardError>(LaggingIndicators {
                unemployment: unemployment?,
                inflation: inflation?,
                last_updated: Utc::now(),
            })
        })()
        .map_err(|e| DashboardError::Aggregate { group: "lagging", source: Box::new(e) })?;

        info!(
            fallbacks = count_fallbacks(&[lagging.unemployment.origin, lagging.inflation.origin]),
            "Lagging indicators refreshed"
        );
        Ok(lagging)
    }
}

fn count_fallbacks(origins: &[DataOrigin]) -> usize {
    origins.iter().filter(|o| o.is_fallback()).count()
}
