//! Feature engineering: turning a monthly series into a supervised
//! learning table, and reconstructing single rows at inference time.

mod align;
mod table;

pub use align::align_features;
pub use table::{build_feature_table, FeatureRow, FeatureTable, FEATURE_NAMES, N_LAGS};
