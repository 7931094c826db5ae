//! # sales-forecast
//!
//! Monthly sales forecasting from a univariate event-level series.
//!
//! Training side: aggregate raw dated records into a monthly series,
//! derive lag/calendar/rolling-mean features, split time-honestly,
//! fit a tree-ensemble regressor, and score it against a seasonal-naive
//! baseline. Serving side: reconstruct the model's expected feature row
//! from four scalar inputs and answer predictions behind a fallback
//! guard that prioritizes availability over model freshness.

pub mod baseline;
pub mod core;
pub mod error;
pub mod features;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod serve;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{MonthlySeries, RawRecord};
    pub use crate::error::{ForecastError, Result};
    pub use crate::features::{align_features, build_feature_table, FeatureTable};
    pub use crate::models::{ModelKind, TrainedModel};
    pub use crate::pipeline::{run_training, TrainingConfig, TrainingReport};
    pub use crate::utils::MetricSet;
}
