//! Monthly sales series: month-start buckets with summed totals.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// A raw event-level record: one dated sale amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRecord {
    pub date: NaiveDate,
    pub amount: f64,
}

impl RawRecord {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// A univariate monthly series: strictly increasing month-start
/// timestamps paired with summed sales totals. Months absent from the
/// input stay absent; they are not filled with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    timestamps: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Create a series from parallel timestamp/value vectors.
    ///
    /// Timestamps must be month-start dates in strictly increasing order.
    pub fn new(timestamps: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        for ts in &timestamps {
            if ts.day() != 1 {
                return Err(ForecastError::Configuration(format!(
                    "timestamp {ts} is not a month-start date"
                )));
            }
        }
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::Configuration(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { timestamps, values })
    }

    /// Collapse raw dated records into a monthly total series.
    ///
    /// Values are summed within each month-start bucket. Records are
    /// accepted in any order.
    pub fn aggregate_monthly(records: &[RawRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for rec in records {
            let bucket = month_start(rec.date);
            *buckets.entry(bucket).or_insert(0.0) += rec.amount;
        }

        let (timestamps, values) = buckets.into_iter().unzip();
        Ok(Self { timestamps, values })
    }

    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamp and value at `index`.
    pub fn point(&self, index: usize) -> Option<(NaiveDate, f64)> {
        Some((*self.timestamps.get(index)?, *self.values.get(index)?))
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // day 1 of an existing month always exists
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn aggregates_into_month_start_buckets() {
        let records = vec![
            RawRecord::new(d(2017, 1, 5), 100.0),
            RawRecord::new(d(2017, 1, 20), 50.0),
            RawRecord::new(d(2017, 3, 2), 30.0),
        ];
        let series = MonthlySeries::aggregate_monthly(&records).unwrap();
        assert_eq!(series.timestamps(), &[d(2017, 1, 1), d(2017, 3, 1)]);
        assert_eq!(series.values(), &[150.0, 30.0]);
    }

    #[test]
    fn missing_months_stay_absent() {
        let records = vec![
            RawRecord::new(d(2017, 1, 5), 10.0),
            RawRecord::new(d(2017, 4, 5), 20.0),
        ];
        let series = MonthlySeries::aggregate_monthly(&records).unwrap();
        // February and March are absent, not zero
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn unordered_records_are_sorted() {
        let records = vec![
            RawRecord::new(d(2017, 6, 1), 5.0),
            RawRecord::new(d(2017, 2, 1), 7.0),
        ];
        let series = MonthlySeries::aggregate_monthly(&records).unwrap();
        assert_eq!(series.timestamps(), &[d(2017, 2, 1), d(2017, 6, 1)]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(
            MonthlySeries::aggregate_monthly(&[]),
            Err(ForecastError::EmptyData)
        );
    }

    #[test]
    fn rejects_non_month_start_timestamps() {
        let err = MonthlySeries::new(vec![d(2017, 1, 15)], vec![1.0]).unwrap_err();
        assert!(matches!(err, ForecastError::Configuration(_)));
    }

    #[test]
    fn rejects_unordered_timestamps() {
        let err =
            MonthlySeries::new(vec![d(2017, 2, 1), d(2017, 1, 1)], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ForecastError::Configuration(_)));
    }
}
