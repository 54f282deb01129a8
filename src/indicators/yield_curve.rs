use crate::models::{Maturity, YieldCurvePoint};

/// Returns the curve in canonical maturity order (3M .. 30Y), whatever order it was fetched in.
/// If a maturity appears twice the later entry wins.
pub fn canonical_order(points: impl IntoIterator<Item = YieldCurvePoint>) -> Vec<YieldCurvePoint> {
    let mut slots: [Option<f64>; 7] = [None; 7];
    for point in points {
        slots[point.maturity as usize] = Some(point.yield_pct);
    }

    Maturity::ALL
        .iter()
        .zip(slots)
        .filter_map(|(maturity, value)| {
            value.map(|yield_pct| YieldCurvePoint { maturity: *maturity, yield_pct })
        })
        .collect()
}

pub fn yield_at(points: &[YieldCurvePoint], maturity: Maturity) -> Option<f64> {
    points.iter().find(|p| p.maturity == maturity).map(|p| p.yield_pct)
}

/// `Some(true)` when the 2-Year yield is strictly above the 10-Year yield.
/// `None` when either maturity is missing from the curve.
pub fn is_inverted(points: &[YieldCurvePoint]) -> Option<bool> {
    let two_year = yield_at(points, Maturity::TwoYear)?;
    let ten_year = yield_at(points, Maturity::TenYear)?;
    Some(two_year > ten_year)
}
