//! CART regression tree with variance-reduction splits.
//!
//! Building block for both ensemble variants. Splits minimize the summed
//! squared error of the two children; leaves predict the mean target of
//! the rows they hold.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Tree growth limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth; `None` grows until leaves are pure or too small.
    pub max_depth: Option<usize>,
    /// Minimum rows required to attempt a split.
    pub min_samples_split: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: Node,
    n_features: usize,
}

impl RegressionTree {
    /// Fit a tree on the rows selected by `indices`.
    ///
    /// Taking explicit indices lets the ensembles pass bootstrap or
    /// subsample selections without copying the data.
    pub fn fit(
        features: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        config: &TreeConfig,
    ) -> Result<Self> {
        if features.is_empty() || indices.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if features.len() != targets.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: features.len(),
                got: targets.len(),
            });
        }

        let n_features = features[0].len();
        let root = build_node(features, targets, indices, 0, config);
        Ok(Self { root, n_features })
    }

    /// Predict a single feature row.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(ForecastError::DimensionMismatch {
                expected: self.n_features,
                got: row.len(),
            });
        }

        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

fn build_node(
    features: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    depth: usize,
    config: &TreeConfig,
) -> Node {
    let mean = indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64;

    let depth_reached = config.max_depth.is_some_and(|d| depth >= d);
    if depth_reached || indices.len() < config.min_samples_split {
        return Node::Leaf { value: mean };
    }

    let Some(split) = best_split(features, targets, indices) else {
        return Node::Leaf { value: mean };
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| features[i][split.feature] <= split.threshold);

    if left_idx.is_empty() || right_idx.is_empty() {
        return Node::Leaf { value: mean };
    }

    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(build_node(features, targets, &left_idx, depth + 1, config)),
        right: Box::new(build_node(features, targets, &right_idx, depth + 1, config)),
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    cost: f64,
}

/// Exhaustive best split over all features and cut points.
///
/// Uses prefix sums over the rows sorted by feature value, so each
/// feature scan is a single pass.
fn best_split(features: &[Vec<f64>], targets: &[f64], indices: &[usize]) -> Option<SplitCandidate> {
    let n_features = features[0].len();
    let mut best: Option<SplitCandidate> = None;

    for feature in 0..n_features {
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| {
            features[a][feature]
                .partial_cmp(&features[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let n = order.len();
        let total_sum: f64 = order.iter().map(|&i| targets[i]).sum();
        let total_sq: f64 = order.iter().map(|&i| targets[i] * targets[i]).sum();

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;

        for k in 1..n {
            let prev = order[k - 1];
            left_sum += targets[prev];
            left_sq += targets[prev] * targets[prev];

            let lo = features[prev][feature];
            let hi = features[order[k]][feature];
            if hi <= lo {
                continue; // no cut between equal values
            }

            let left_n = k as f64;
            let right_n = (n - k) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;

            let cost = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);

            if best.as_ref().is_none_or(|b| cost < b.cost) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: (lo + hi) / 2.0,
                    cost,
                });
            }
        }
    }

    best
}
