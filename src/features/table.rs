//! Bulk feature construction from a monthly series.

use crate::core::MonthlySeries;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};

/// Number of lag features. Fixed at three: the serving contract supplies
/// exactly three scalar lags.
pub const N_LAGS: usize = 3;

/// Canonical feature column order, captured into trained artifacts.
pub const FEATURE_NAMES: [&str; 6] = [
    "lag_1",
    "lag_2",
    "lag_3",
    "month",
    "roll_mean_3",
    "roll_mean_6",
];

/// One supervised-learning row: features aligned to the table's column
/// order plus the target value for that month.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Month-start timestamp of the target.
    pub month_start: NaiveDate,
    /// Feature values, ordered as the table's `feature_names`.
    pub features: Vec<f64>,
    /// Target sales total for this month.
    pub target: f64,
}

/// Chronological feature rows with their shared column ordering.
///
/// Ordering is significant: it drives the train/test boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    feature_names: Vec<String>,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(feature_names: Vec<String>, rows: Vec<FeatureRow>) -> Result<Self> {
        for row in &rows {
            if row.features.len() != feature_names.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: feature_names.len(),
                    got: row.features.len(),
                });
            }
        }
        Ok(Self {
            feature_names,
            rows,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Feature vectors only, row-major.
    pub fn feature_matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.features.clone()).collect()
    }

    /// Target values in row order.
    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.target).collect()
    }

    /// A new table holding the rows in `range`, same column order.
    pub(crate) fn slice(&self, range: std::ops::Range<usize>) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            rows: self.rows[range].to_vec(),
        }
    }
}

/// Build the supervised table from a monthly series.
///
/// Row at month *t* carries `lag_i = value(t - i)` for i = 1..3, the
/// calendar month number, and trailing rolling means over the values
/// strictly before *t* (windows 3 and 6, minimum period 1). Months that
/// cannot form all three lags are dropped, so the first `N_LAGS` series
/// points never become rows.
pub fn build_feature_table(series: &MonthlySeries) -> Result<FeatureTable> {
    if series.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if series.len() <= N_LAGS {
        return Err(ForecastError::InsufficientData {
            needed: N_LAGS + 1,
            got: series.len(),
        });
    }

    let values = series.values();
    let timestamps = series.timestamps();

    let mut rows = Vec::with_capacity(series.len() - N_LAGS);
    for t in N_LAGS..series.len() {
        let mut features = Vec::with_capacity(FEATURE_NAMES.len());
        for i in 1..=N_LAGS {
            features.push(values[t - i]);
        }
        features.push(f64::from(timestamps[t].month()));
        features.push(trailing_mean(values, t, 3));
        features.push(trailing_mean(values, t, 6));

        rows.push(FeatureRow {
            month_start: timestamps[t],
            features,
            target: values[t],
        });
    }

    let names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    FeatureTable::new(names, rows)
}

/// Mean of up to `window` values strictly before index `t`.
///
/// Matches a shift-by-one trailing rolling mean with minimum period 1:
/// early rows use a shorter effective window instead of going missing.
fn trailing_mean(values: &[f64], t: usize, window: usize) -> f64 {
    let start = t.saturating_sub(window);
    let slice = &values[start..t];
    slice.iter().sum::<f64>() / slice.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> MonthlySeries {
        let timestamps = (0..values.len())
            .map(|i| {
                NaiveDate::from_ymd_opt(2017 + i as i32 / 12, (i as u32 % 12) + 1, 1).unwrap()
            })
            .collect();
        MonthlySeries::new(timestamps, values.to_vec()).unwrap()
    }

    #[test]
    fn first_three_months_are_dropped() {
        let s = series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let table = build_feature_table(&s).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows()[0].month_start,
            NaiveDate::from_ymd_opt(2017, 4, 1).unwrap()
        );
    }

    #[test]
    fn lags_and_month_are_exact() {
        let s = series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let table = build_feature_table(&s).unwrap();
        let row = &table.rows()[0]; // April: target 40
        assert_eq!(row.target, 40.0);
        // lag_1 = March, lag_2 = February, lag_3 = January
        assert_eq!(&row.features[..3], &[30.0, 20.0, 10.0]);
        assert_eq!(row.features[3], 4.0);
    }

    #[test]
    fn rolling_means_use_values_strictly_before_the_row() {
        let s = series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let table = build_feature_table(&s).unwrap();

        // April row: roll_mean_3 over Jan..Mar, roll_mean_6 over the same
        // three points (shorter effective window).
        let april = &table.rows()[0];
        assert_eq!(april.features[4], 20.0);
        assert_eq!(april.features[5], 20.0);

        // May row: roll_mean_3 over Feb..Apr, roll_mean_6 over Jan..Apr.
        let may = &table.rows()[1];
        assert_eq!(may.features[4], 30.0);
        assert_eq!(may.features[5], 25.0);
    }

    #[test]
    fn full_six_month_window_once_available() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let table = build_feature_table(&s).unwrap();
        // Row for index 6 (t=6): roll_mean_6 over indices 0..6
        let row = &table.rows()[3];
        assert_eq!(row.features[5], 3.5);
    }

    #[test]
    fn too_short_series_is_rejected() {
        let s = series(&[1.0, 2.0, 3.0]);
        assert_eq!(
            build_feature_table(&s),
            Err(ForecastError::InsufficientData { needed: 4, got: 3 })
        );
    }

    #[test]
    fn column_order_matches_canonical_names() {
        let s = series(&[10.0, 20.0, 30.0, 40.0]);
        let table = build_feature_table(&s).unwrap();
        let names: Vec<&str> = table.feature_names().iter().map(String::as_str).collect();
        assert_eq!(names, FEATURE_NAMES);
    }
}
