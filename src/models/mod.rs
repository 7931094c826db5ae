//! Interchangeable regressors and their persisted artifacts.

mod artifact;
#[cfg(feature = "boosted")]
mod gradient_boost;
mod random_forest;
mod tree;

pub use artifact::{artifact_path, TrainedModel, ARTIFACT_PREFIX};
#[cfg(feature = "boosted")]
pub use gradient_boost::GradientBoostedRegressor;
pub use random_forest::RandomForestRegressor;
pub use tree::{RegressionTree, TreeConfig};

use crate::error::{ForecastError, Result};
use crate::features::FeatureTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which regressor variant to train or serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    RandomForest,
    GradientBoosted,
}

impl ModelKind {
    /// Short alias used in artifact file names and API requests.
    pub fn alias(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "rf",
            ModelKind::GradientBoosted => "gbt",
        }
    }

    /// All variants, in serving preference order.
    pub fn all() -> [ModelKind; 2] {
        [ModelKind::RandomForest, ModelKind::GradientBoosted]
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

impl FromStr for ModelKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rf" | "random_forest" | "randomforest" => Ok(ModelKind::RandomForest),
            "gbt" | "xgb" | "gradient_boosted" | "gradientboosted" => Ok(ModelKind::GradientBoosted),
            other => Err(ForecastError::Configuration(format!(
                "unknown model variant '{other}' (expected 'rf' or 'gbt')"
            ))),
        }
    }
}

/// Common capability contract for the regressor variants.
pub trait Regressor {
    /// Fit on row-major feature vectors and aligned targets.
    fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<()>;

    /// Predict one value per feature row.
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Model display name.
    fn name(&self) -> &'static str;
}

/// A fitted estimator, tagged by variant.
///
/// Tagged rather than trait-object based so artifacts serialize cleanly
/// and the serving layer stays ignorant of estimator internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FittedModel {
    RandomForest(RandomForestRegressor),
    #[cfg(feature = "boosted")]
    GradientBoosted(GradientBoostedRegressor),
}

impl FittedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            FittedModel::RandomForest(_) => ModelKind::RandomForest,
            #[cfg(feature = "boosted")]
            FittedModel::GradientBoosted(_) => ModelKind::GradientBoosted,
        }
    }

    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        match self {
            FittedModel::RandomForest(m) => m.predict(features),
            #[cfg(feature = "boosted")]
            FittedModel::GradientBoosted(m) => m.predict(features),
        }
    }

    /// Predict a single row.
    pub fn predict_one(&self, row: &[f64]) -> Result<f64> {
        let rows = vec![row.to_vec()];
        let out = self.predict(&rows)?;
        out.first()
            .copied()
            .ok_or_else(|| ForecastError::Alignment("estimator returned no prediction".to_string()))
    }
}

/// Fit the requested variant on a training table and capture the ordered
/// feature names the estimator saw during fitting.
///
/// Selecting the gradient-boosted variant in a build without the
/// `boosted` feature fails with `DependencyUnavailable`.
pub fn train(kind: ModelKind, table: &FeatureTable) -> Result<TrainedModel> {
    if table.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    #[cfg(not(feature = "boosted"))]
    if kind == ModelKind::GradientBoosted {
        return Err(ForecastError::DependencyUnavailable(
            kind.alias().to_string(),
        ));
    }

    let features = table.feature_matrix();
    let targets = table.targets();

    let model = match kind {
        ModelKind::RandomForest => {
            let mut rf = RandomForestRegressor::default();
            rf.fit(&features, &targets)?;
            FittedModel::RandomForest(rf)
        }
        #[cfg(feature = "boosted")]
        ModelKind::GradientBoosted => {
            let mut gbt = GradientBoostedRegressor::default();
            gbt.fit(&features, &targets)?;
            FittedModel::GradientBoosted(gbt)
        }
        // Unreachable: the early return above covers this variant.
        #[cfg(not(feature = "boosted"))]
        ModelKind::GradientBoosted => unreachable!(),
    };

    Ok(TrainedModel::new(
        kind,
        table.feature_names().to_vec(),
        model,
    ))
}
