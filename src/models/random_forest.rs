//! Bagged ensemble of regression trees.

use crate::error::{ForecastError, Result};
use crate::models::tree::{RegressionTree, TreeConfig};
use crate::models::Regressor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Random forest regressor: each tree is grown on a bootstrap sample of
/// the training rows and predictions are averaged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    n_estimators: usize,
    seed: u64,
    tree_config: TreeConfig,
    trees: Vec<RegressionTree>,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        // 300 trees, fixed seed for reproducible training runs.
        Self::new(300, 42)
    }
}

impl RandomForestRegressor {
    pub fn new(n_estimators: usize, seed: u64) -> Self {
        Self {
            n_estimators,
            seed,
            tree_config: TreeConfig::default(),
            trees: Vec::new(),
        }
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}

impl Regressor for RandomForestRegressor {
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

        let n = features.len();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(RegressionTree::fit(
                features,
                targets,
                &sample,
                &self.tree_config,
            )?);
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
                let sum = self
                    .trees
                    .iter()
                    .map(|t| t.predict_row(row))
                    .sum::<Result<f64>>()?;
                Ok(sum / self.trees.len() as f64)
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "RandomForest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let features: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i % 4) as f64]).collect();
        let targets: Vec<f64> = (0..20).map(|i| if i < 10 { 10.0 } else { 100.0 }).collect();
        (features, targets)
    }

    #[test]
    fn learns_a_step_function() {
        let (features, targets) = toy_data();
        let mut rf = RandomForestRegressor::new(25, 42);
        rf.fit(&features, &targets).unwrap();

        let preds = rf.predict(&[vec![2.0, 2.0], vec![17.0, 1.0]]).unwrap();
        assert!(preds[0] < 40.0, "low regime, got {}", preds[0]);
        assert!(preds[1] > 70.0, "high regime, got {}", preds[1]);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let (features, targets) = toy_data();
        let mut a = RandomForestRegressor::new(10, 7);
        let mut b = RandomForestRegressor::new(10, 7);
        a.fit(&features, &targets).unwrap();
        b.fit(&features, &targets).unwrap();

        let rows = vec![vec![5.0, 1.0], vec![15.0, 3.0]];
        assert_eq!(a.predict(&rows).unwrap(), b.predict(&rows).unwrap());
    }

    #[test]
    fn predict_before_fit_is_rejected() {
        let rf = RandomForestRegressor::new(10, 0);
        assert_eq!(
            rf.predict(&[vec![1.0]]),
            Err(ForecastError::FitRequired)
        );
    }
}
