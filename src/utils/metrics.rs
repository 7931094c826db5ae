//! Accuracy metrics for holdout evaluation.

use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Floor for the sMAPE denominator.
const SMAPE_EPS: f64 = 1e-8;

/// Accuracy metrics over (actual, predicted) pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSet {
    /// Mean Absolute Percentage Error, in percent. True-zero actuals are
    /// excluded from the denominator; `None` when every actual is zero.
    pub mape: Option<f64>,
    /// Symmetric MAPE, in percent, denominator floored at an epsilon.
    pub smape: f64,
    /// Mean Absolute Error.
    pub mae: f64,
    /// Root Mean Squared Error.
    pub rmse: f64,
}

/// Compute metrics between actual and predicted values.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<MetricSet> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;

    let mae = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;

    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;
    let rmse = mse.sqrt();

    // MAPE over the non-zero actuals only.
    let nonzero: Vec<(f64, f64)> = actual
        .iter()
        .zip(predicted)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, p)| (*a, *p))
        .collect();
    let mape = if nonzero.is_empty() {
        None
    } else {
        let sum: f64 = nonzero.iter().map(|(a, p)| ((a - p) / a).abs()).sum();
        Some(100.0 * sum / nonzero.len() as f64)
    };

    let smape = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| {
            let denom = (a.abs() + p.abs()).max(SMAPE_EPS);
            2.0 * (a - p).abs() / denom
        })
        .sum::<f64>()
        * 100.0
        / n;

    Ok(MetricSet {
        mape,
        smape,
        mae,
        rmse,
    })
}

/// Compute metrics where some predictions may be undefined.
///
/// Pairs whose prediction is `None` are skipped; the remaining pairs keep
/// their index alignment with `actual`. Used for the seasonal-naive
/// baseline, which can be undefined at the very start of a series.
pub fn evaluate_with_missing(actual: &[f64], predicted: &[Option<f64>]) -> Result<MetricSet> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let (a, p): (Vec<f64>, Vec<f64>) = actual
        .iter()
        .zip(predicted)
        .filter_map(|(a, p)| p.map(|p| (*a, p)))
        .unzip();

    evaluate(&a, &p)
}
