//! Gradient-boosted regression trees.

use crate::error::{ForecastError, Result};
use crate::models::tree::{RegressionTree, TreeConfig};
use crate::models::Regressor;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Gradient-boosted trees: a staged ensemble of shallow trees fit on the
/// residuals of the stages before, scaled by a learning rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedRegressor {
    n_estimators: usize,
    learning_rate: f64,
    max_depth: usize,
    /// Fraction of training rows sampled (without replacement) per stage.
    subsample: f64,
    seed: u64,
    init: f64,
    trees: Vec<RegressionTree>,
}

impl Default for GradientBoostedRegressor {
    fn default() -> Self {
        // Shallow trees, mild learning rate, light row subsampling.
        Self::new(400, 0.08, 4, 0.9, 42)
    }
}

impl GradientBoostedRegressor {
    pub fn new(
        n_estimators: usize,
        learning_rate: f64,
        max_depth: usize,
        subsample: f64,
        seed: u64,
    ) -> Self {
        Self {
            n_estimators,
            learning_rate,
            max_depth,
            subsample,
            seed,
            init: 0.0,
            trees: Vec::new(),
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}

impl Regressor for GradientBoostedRegressor {
    fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        if features.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if features.len() != targets.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: features.len(),
                got: targets.len(),
            });
        }
        if !(0.0..=1.0).contains(&self.subsample) || self.subsample == 0.0 {
            return Err(ForecastError::Configuration(format!(
                "subsample must be in (0, 1], got {}",
                self.subsample
            )));
        }

        let n = features.len();
        let mut rng = StdRng::seed_from_u64(self.seed);

        self.init = targets.iter().sum::<f64>() / n as f64;
        let mut current: Vec<f64> = vec![self.init; n];
        let mut trees = Vec::with_capacity(self.n_estimators);

        let tree_config = TreeConfig {
            max_depth: Some(self.max_depth),
            min_samples_split: 2,
        };
        let sample_size = ((n as f64 * self.subsample).round() as usize).clamp(1, n);
        let mut all: Vec<usize> = (0..n).collect();

        for _ in 0..self.n_estimators {
            let residuals: Vec<f64> = targets
                .iter()
                .zip(&current)
                .map(|(y, f)| y - f)
                .collect();

            all.shuffle(&mut rng);
            let sample = &all[..sample_size];

            let tree = RegressionTree::fit(features, &residuals, sample, &tree_config)?;
            for (i, row) in features.iter().enumerate() {
                current[i] += self.learning_rate * tree.predict_row(row)?;
            }
            trees.push(tree);
        }

        self.trees = trees;
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(ForecastError::FitRequired);
        }

        features
            .iter()
            .map(|row| {
                let mut value = self.init;
                for tree in &self.trees {
                    value += self.learning_rate * tree.predict_row(row)?;
                }
                Ok(value)
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "GradientBoosted"
    }
}
