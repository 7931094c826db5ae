//! Inference-time feature alignment.
//!
//! Reconstructs a single feature row matching a trained model's expected
//! column order from the four scalars a caller supplies.

/// Align a feature row to `expected` column names.
///
/// Each requested name is resolved case-insensitively against an alias
/// table (`lag1`/`lag_1`/`l1` all mean the first lag); names that resolve
/// to nothing are filled with `0.0` so serving never fails on unexpected
/// model metadata. When `expected` is empty the row falls back to the
/// fixed three-column `[lag1, lag2, lag3]` layout.
///
/// Both rolling means are approximated as the mean of the three supplied
/// lags. This is a deliberate proxy: the caller does not supply six
/// periods of history, so the value drifts from the training-time
/// rolling mean whenever longer context existed. Known accuracy gap.
pub fn align_features(lags: [f64; 3], month: u32, expected: &[String]) -> Vec<f64> {
    let [lag1, lag2, lag3] = lags;

    if expected.is_empty() {
        return vec![lag1, lag2, lag3];
    }

    let roll = (lag1 + lag2 + lag3) / 3.0;

    expected
        .iter()
        .map(|name| match name.to_lowercase().as_str() {
            "lag_1" | "lag1" | "l1" => lag1,
            "lag_2" | "lag2" | "l2" => lag2,
            "lag_3" | "lag3" | "l3" => lag3,
            "month" => f64::from(month),
            "roll_mean_3" | "rollmean3" | "sma3" | "avg3" | "mean3" => roll,
            "roll_mean_6" | "rollmean6" | "sma6" | "avg6" | "mean6" => roll,
            _ => 0.0,
        })
        .collect()
}
