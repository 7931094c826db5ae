//! Time-aware train/test partitioning of a feature table.

use crate::error::{ForecastError, Result};
use crate::features::FeatureTable;

/// Default number of most-recent months held out for evaluation.
pub const DEFAULT_HORIZON: usize = 3;

/// Split a feature table so the last `horizon` rows become the holdout
/// set, in original chronological order, and everything before them is
/// training data.
///
/// Fails with a configuration error when `horizon < 1` or when no
/// training rows would remain.
pub fn split_train_test(
    table: &FeatureTable,
    horizon: usize,
) -> Result<(FeatureTable, FeatureTable)> {
    if horizon < 1 {
        return Err(ForecastError::Configuration(
            "horizon must be at least 1".to_string(),
        ));
    }
    if horizon >= table.len() {
        return Err(ForecastError::Configuration(format!(
            "horizon {} leaves no training rows (table has {})",
            horizon,
            table.len()
        )));
    }

    let boundary = table.len() - horizon;
    Ok((table.slice(0..boundary), table.slice(boundary..table.len())))
}
