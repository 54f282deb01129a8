use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use recession_dashboard_lib::core::refresh::{DashboardState, RefreshOutcome};
use recession_dashboard_lib::core::retry::Backoff;
use recession_dashboard_lib::fetcher::fallback::FallbackTable;
use recession_dashboard_lib::fetcher::series::SeriesFetcher;
use recession_dashboard_lib::fetcher::DataSource;
use recession_dashboard_lib::indicators::registry::Registry;
use recession_dashboard_lib::indicators::IndicatorId;
use recession_dashboard_lib::models::{DataOrigin, RawObservation, Trend};
use recession_dashboard_lib::{DashboardError, IndicatorService};

/// Serves 13 months of synthetic data for every indicator except the ones listed as down.
struct FakeUpstream {
    down: Vec<IndicatorId>,
    calls: AtomicUsize,
}

impl FakeUpstream {
    fn new(down: &[IndicatorId]) -> Arc<Self> {
        Arc::new(Self { down: down.to_vec(), calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl DataSource for FakeUpstream {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_data(&self, indicator: IndicatorId, limit: usize) -> anyhow::Result<Vec<RawObservation>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.contains(&indicator) {
            anyhow::bail!("503 Service Unavailable");
        }

        let base = match indicator {
            IndicatorId::Pmi => 48.0,
            IndicatorId::HousingStarts => 1300.0,
            IndicatorId::MoneySupply => 21000.0,
            IndicatorId::Inflation => 310.0,
            IndicatorId::Unemployment => 4.0,
            IndicatorId::TreasurySpread => 0.1,
            _ => 4.0 + indicator.index() as f64 / 100.0,
        };
        // Upstream order is newest first, like FRED with sort_order=desc
        Ok((0..limit)
            .rev()
            .map(|i| {
                let month = (i % 12) as u32 + 1;
                let year = 2024 + (i / 12) as i32;
                RawObservation {
                    date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
                    value: base + i as f64 * 0.1,
                }
            })
            .collect())
    }
}

/// Always answers with the last 12 months, whatever window was asked for, like the hosted function.
struct FixedTwelveRows;

#[async_trait]
impl DataSource for FixedTwelveRows {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch_data(&self, _indicator: IndicatorId, _limit: usize) -> anyhow::Result<Vec<RawObservation>> {
        // M2 up 5% across the window, with a small dip in the latest month
        let mut rows: Vec<RawObservation> = (0..11)
            .map(|i| RawObservation {
                date: NaiveDate::from_ymd_opt(2024, i + 1, 1).unwrap(),
                value: 20000.0 + i as f64 * 110.0,
            })
            .collect();
        rows.push(RawObservation { date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(), value: 21000.0 });
        Ok(rows)
    }
}

fn service(source: Arc<dyn DataSource>) -> IndicatorService {
    IndicatorService::new(SeriesFetcher::new(source, FallbackTable::builtin()).with_backoff(Backoff::none()))
}

#[tokio::test]
async fn leading_survives_pmi_outage() {
    let leading = service(FakeUpstream::new(&[IndicatorId::Pmi]))
        .get_all_leading_indicators()
        .await
        .expect("leading aggregate should succeed on fallback");

    assert!(matches!(leading.pmi.origin, DataOrigin::Fallback { .. }));
    assert_eq!(leading.pmi.indicator.value, 49.3);
    assert_eq!(leading.housing_starts.origin, DataOrigin::Live);
    assert_eq!(leading.money_supply.origin, DataOrigin::Live);
    assert_eq!(leading.yield_curve.origin, DataOrigin::Live);

    let maturities: Vec<&str> = leading.yield_curve.points.iter().map(|p| p.maturity.label()).collect();
    assert_eq!(maturities, vec!["3M", "6M", "1Y", "2Y", "5Y", "10Y", "30Y"]);
    // Synthetic yields rise with maturity
    assert_eq!(leading.yield_curve.inverted, Some(false));
}

#[tokio::test]
async fn live_series_are_ascending_with_trend() {
    let lagging = service(FakeUpstream::new(&[])).get_all_lagging_indicators().await.unwrap();

    let inflation = &lagging.inflation;
    assert_eq!(inflation.time_series_data.len(), 13);
    assert_eq!(inflation.time_series_data.first().unwrap().label, "Jan 24");
    assert_eq!(inflation.time_series_data.last().unwrap().label, "Jan 25");
    assert_eq!(inflation.trend_line.len(), inflation.time_series_data.len());
    assert_eq!(inflation.trend_line[0], inflation.time_series_data[0].value);
    assert_eq!(inflation.indicator.trend, Trend::Up);
    assert!(inflation.indicator.yoy_change > 0.0);

    let unemployment = &lagging.unemployment;
    assert_eq!(unemployment.time_series_data.len(), 12);
    assert!(unemployment.domain.unwrap().min >= 0.0);
}

#[tokio::test]
async fn money_supply_headline_is_yoy_on_twelve_rows() {
    let card = service(Arc::new(FixedTwelveRows))
        .get_indicator(IndicatorId::MoneySupply)
        .await
        .unwrap();

    assert_eq!(card.origin, DataOrigin::Live);
    assert_eq!(card.time_series_data.len(), 12);
    assert!((card.indicator.yoy_change - 5.0).abs() < 1e-9);
    assert!(card.indicator.mom_change < 0.0);
    assert_eq!(card.indicator.change, card.indicator.yoy_change);
    assert_eq!(card.indicator.trend, Trend::Up);
    assert_eq!(card.change_display, "+5.0%");
}

#[tokio::test]
async fn total_outage_serves_every_card_from_fallback() {
    let source = FakeUpstream::new(&IndicatorId::ALL);
    let svc = service(source.clone());

    let (leading, lagging) = tokio::join!(svc.get_all_leading_indicators(), svc.get_all_lagging_indicators());
    let leading = leading.unwrap();
    let lagging = lagging.unwrap();

    for origin in [
        leading.yield_curve.origin,
        leading.treasury_spread.origin,
        leading.housing_starts.origin,
        leading.pmi.origin,
        leading.money_supply.origin,
        lagging.unemployment.origin,
        lagging.inflation.origin,
    ] {
        assert!(origin.is_fallback());
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), IndicatorId::ALL.len());
}

#[tokio::test]
async fn broken_fallback_table_is_aggregate_error() {
    let mut table = FallbackTable::builtin();
    table.remove(IndicatorId::HousingStarts);
    let svc = IndicatorService::new(
        SeriesFetcher::new(FakeUpstream::new(&[IndicatorId::HousingStarts]), table).with_backoff(Backoff::none()),
    );

    let err = svc.get_all_leading_indicators().await.unwrap_err();
    match err {
        DashboardError::Aggregate { group, source } => {
            assert_eq!(group, "leading");
            assert!(matches!(*source, DashboardError::MissingFallback(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn refresh_publishes_latest_snapshot() {
    let state = DashboardState::new(Arc::new(service(FakeUpstream::new(&[]))));
    assert!(state.leading().is_none());

    assert_eq!(state.refresh_leading().await.unwrap(), RefreshOutcome::Published);
    assert_eq!(state.refresh_lagging().await.unwrap(), RefreshOutcome::Published);
    assert!(state.leading().is_some());
    assert!(state.lagging().is_some());
}

#[test]
fn audit_registry_and_fallbacks() {
    let indicators = Registry::get_available_indicators();
    assert_eq!(indicators.len(), IndicatorId::ALL.len());

    let series_ids: HashSet<&str> = indicators.iter().map(|m| m.series_id.as_str()).collect();
    assert_eq!(series_ids.len(), indicators.len(), "upstream series ids must be unique");

    let table = FallbackTable::builtin();
    assert!(table.missing().is_empty(), "missing fallbacks: {:?}", table.missing());

    for meta in indicators {
        let entry = table.get(meta.id).unwrap();
        assert!(!entry.observations.is_empty(), "{} fallback is empty", meta.id);
        assert!(entry.observations.iter().all(|o| o.value.is_finite()));
        assert!(
            entry.observations.windows(2).all(|w| w[0].date < w[1].date),
            "{} fallback is not ascending",
            meta.id
        );
        assert!(entry.observations.iter().all(|o| o.date <= entry.as_of));
        assert!(entry.as_of.year() >= 2024);
    }
}
