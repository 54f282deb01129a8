use crate::indicators::registry::DomainRule;
use crate::models::AxisDomain;

/// Trailing trend-line window, in periods.
pub const TREND_WINDOW: usize = 3;

/// Simple average of the last `period` values. `None` when there are fewer than `period`.
pub fn calculate_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    let sum: f64 = data.iter().rev().take(period).sum();
    Some(sum / period as f64)
}

/// Trailing moving average, one value per input point.
///
/// Near the start of the series the window shrinks to `i + 1` points instead of
/// leaving the value undefined, so index 0 is always the first value itself.
pub fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..data.len())
        .filter_map(|i| {
            let size = window.min(i + 1);
            calculate_sma(&data[..=i], size)
        })
        .collect()
}

/// Chart axis bounds: `[min - pad, max + pad]`, widened to include the rule's
/// threshold and clamped at its floor.
///
/// Returns `None` when there is no finite value to bound.
pub fn axis_domain(values: &[f64], rule: &DomainRule) -> Option<AxisDomain> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;

    let range = max - min;
    let mut pad = (range * rule.pad_ratio).max(rule.min_pad);
    if pad == 0.0 {
        // Flat series with a pure-ratio rule: pad off the magnitude instead.
        pad = max.abs() * rule.pad_ratio;
        if pad == 0.0 {
            pad = 1.0;
        }
    }

    let mut lower = min - pad;
    let mut upper = max + pad;

    if let Some(threshold) = rule.include {
        lower = lower.min(threshold);
        upper = upper.max(threshold);
    }
    if let Some(floor) = rule.floor {
        lower = lower.max(floor);
    }

    Some(AxisDomain { min: lower, max: upper })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::registry::{Registry, YIELD_CURVE_DOMAIN};
    use crate::indicators::IndicatorId;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sma() {
        assert_eq!(calculate_sma(&[1.0, 2.0, 3.0, 4.0], 2), Some(3.5));
        assert_eq!(calculate_sma(&[1.0], 2), None);
        assert_eq!(calculate_sma(&[1.0], 0), None);
    }

    #[test]
    fn test_moving_average_first_value_is_itself() {
        let data = [4.3, 4.2, 4.1, 4.1, 4.0];
        let ma = moving_average(&data, TREND_WINDOW);
        assert_eq!(ma.len(), data.len());
        assert_eq!(ma[0], 4.3);
        assert!(approx(ma[1], 4.25));
        assert!(approx(ma[2], 4.2));
        assert!(approx(ma[4], (4.1 + 4.1 + 4.0) / 3.0));
    }

    #[test]
    fn test_moving_average_empty() {
        assert!(moving_average(&[], TREND_WINDOW).is_empty());
    }

    #[test]
    fn test_domain_ratio_padding() {
        let rule = Registry::metadata(IndicatorId::MoneySupply).domain;
        let domain = axis_domain(&[21000.0, 21500.0], &rule).unwrap();
        assert!(approx(domain.min, 20990.0));
        assert!(approx(domain.max, 21510.0));
    }

    #[test]
    fn test_domain_min_pad_and_floor() {
        let rule = Registry::metadata(IndicatorId::Unemployment).domain;
        let domain = axis_domain(&[4.1, 4.2], &rule).unwrap();
        assert!(approx(domain.min, 3.9));
        assert!(approx(domain.max, 4.4));

        let domain = axis_domain(&[0.1, 0.15], &rule).unwrap();
        assert_eq!(domain.min, 0.0);
    }

    #[test]
    fn test_domain_pmi_includes_fifty() {
        let rule = Registry::metadata(IndicatorId::Pmi).domain;
        let domain = axis_domain(&[46.0, 48.0], &rule).unwrap();
        assert!(approx(domain.min, 45.0));
        assert_eq!(domain.max, 50.0);

        let expanding = axis_domain(&[52.0, 55.0], &rule).unwrap();
        assert_eq!(expanding.min, 50.0);
    }

    #[test]
    fn test_domain_inflation_floor() {
        let rule = Registry::metadata(IndicatorId::Inflation).domain;
        let domain = axis_domain(&[0.2, 3.0], &rule).unwrap();
        assert_eq!(domain.min, 0.0);
        assert!(approx(domain.max, 3.28));
    }

    #[test]
    fn test_domain_fixed_pad_for_yield_curve() {
        let domain = axis_domain(&[4.0, 4.7], &YIELD_CURVE_DOMAIN).unwrap();
        assert!(approx(domain.min, 3.8));
        assert!(approx(domain.max, 4.9));
    }

    #[test]
    fn test_domain_flat_series() {
        let rule = Registry::metadata(IndicatorId::HousingStarts).domain;
        let domain = axis_domain(&[1000.0, 1000.0], &rule).unwrap();
        assert!(approx(domain.min, 950.0));
        assert!(approx(domain.max, 1050.0));

        let zero = axis_domain(&[0.0], &rule).unwrap();
        assert_eq!((zero.min, zero.max), (-1.0, 1.0));
    }

    #[test]
    fn test_domain_ignores_non_finite() {
        let rule = Registry::metadata(IndicatorId::HousingStarts).domain;
        assert!(axis_domain(&[], &rule).is_none());
        assert!(axis_domain(&[f64::NAN], &rule).is_none());
        let domain = axis_domain(&[f64::NAN, 100.0, 200.0], &rule).unwrap();
        assert!(approx(domain.min, 95.0));
    }
}
