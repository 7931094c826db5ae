//! Seasonal-naive reference forecasts and the serving fallback.

/// Seasonal period of a monthly series.
pub const SEASONAL_PERIOD: usize = 12;

/// Seasonal-naive baseline for a holdout window.
///
/// For each holdout position, the series value exactly twelve periods
/// earlier; when that does not exist, the immediately preceding value;
/// when neither exists, the point is undefined and propagates into
/// metrics as missing rather than erroring.
///
/// `test_start` is the index (into `values`) of the first holdout point.
pub fn seasonal_naive_baseline(
    values: &[f64],
    test_start: usize,
    horizon: usize,
) -> Vec<Option<f64>> {
    (test_start..test_start + horizon)
        .map(|i| {
            i.checked_sub(SEASONAL_PERIOD)
                .and_then(|p| values.get(p).copied())
                .or_else(|| i.checked_sub(1).and_then(|p| values.get(p).copied()))
        })
        .collect()
}

/// Fixed linear combination of the three supplied lags, used whenever
/// the model path fails at serving time.
pub fn linear_fallback(lag1: f64, lag2: f64, lag3: f64) -> f64 {
    0.5 * lag1 + 0.3 * lag2 + 0.2 * lag3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_twelve_month_lookback_when_available() {
        // Two years of monthly values, first year 100..1200.
        let mut values: Vec<f64> = (1..=12).map(|m| 100.0 * m as f64).collect();
        values.extend((1..=12).map(|m| 2000.0 + m as f64));

        // Holdout: January of year two (index 12).
        let baseline = seasonal_naive_baseline(&values, 12, 1);
        assert_eq!(baseline, vec![Some(100.0)]);
    }

    #[test]
    fn falls_back_to_previous_month_inside_first_year() {
        let values: Vec<f64> = (1..=8).map(|m| 10.0 * m as f64).collect();
        // Index 5 has no value 12 months back; previous month is index 4.
        let baseline = seasonal_naive_baseline(&values, 5, 2);
        assert_eq!(baseline, vec![Some(50.0), Some(60.0)]);
    }

    #[test]
    fn undefined_when_no_prior_point_exists() {
        let values = [5.0, 6.0];
        let baseline = seasonal_naive_baseline(&values, 0, 1);
        assert_eq!(baseline, vec![None]);
    }

    #[test]
    fn fallback_weights_are_fixed() {
        let value = linear_fallback(100.0, 200.0, 300.0);
        assert!((value - 170.0).abs() < 1e-12);
    }
}
