//! Shared utilities: forecast accuracy metrics.

mod metrics;

pub use metrics::{evaluate, evaluate_with_missing, MetricSet};
