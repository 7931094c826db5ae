//! Training-run orchestration: series to persisted artifact plus a
//! model-versus-baseline evaluation.

use crate::baseline::seasonal_naive_baseline;
use crate::core::MonthlySeries;
use crate::error::{ForecastError, Result};
use crate::features::build_feature_table;
use crate::models::{artifact_path, train, ModelKind, TrainedModel};
use crate::utils::{evaluate, evaluate_with_missing, MetricSet};
use crate::validation::{split_train_test, DEFAULT_HORIZON};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration of one training run.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub kind: ModelKind,
    /// Number of most-recent months held out for evaluation.
    pub horizon: usize,
    /// Directory receiving the persisted artifact.
    pub model_dir: PathBuf,
}

impl TrainingConfig {
    pub fn new(kind: ModelKind, model_dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            horizon: DEFAULT_HORIZON,
            model_dir: model_dir.into(),
        }
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub kind: ModelKind,
    pub horizon: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub artifact: PathBuf,
    pub model_metrics: MetricSet,
    pub baseline_metrics: MetricSet,
}

/// Run the full offline batch: features, time split, fit, seasonal-naive
/// baseline, metrics for both, artifact persistence.
///
/// Every failure is surfaced; training errors are never swallowed.
pub fn run_training(series: &MonthlySeries, config: &TrainingConfig) -> Result<TrainingReport> {
    let table = build_feature_table(series)?;
    let (train_table, test_table) = split_train_test(&table, config.horizon)?;

    info!(
        kind = %config.kind,
        n_train = train_table.len(),
        n_test = test_table.len(),
        "fitting model"
    );
    let trained = train(config.kind, &train_table)?;

    let actual = test_table.targets();
    let predicted = trained.model().predict(&test_table.feature_matrix())?;
    let model_metrics = evaluate(&actual, &predicted)?;

    // Holdout rows are the last `horizon` months of the series.
    let test_start = series.len() - config.horizon;
    let baseline = seasonal_naive_baseline(series.values(), test_start, config.horizon);
    let baseline_metrics = evaluate_with_missing(&actual, &baseline)?;

    let artifact = persist(&trained, &config.model_dir, config.kind)?;
    info!(artifact = %artifact.display(), "persisted trained model");

    Ok(TrainingReport {
        kind: config.kind,
        horizon: config.horizon,
        n_train: train_table.len(),
        n_test: test_table.len(),
        artifact,
        model_metrics,
        baseline_metrics,
    })
}

fn persist(trained: &TrainedModel, dir: &Path, kind: ModelKind) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|e| ForecastError::Persistence(format!("create {}: {e}", dir.display())))?;
    let path = artifact_path(dir, kind);
    trained.save(&path)?;
    Ok(path)
}
