//! Model registry: artifact discovery and a concurrent get-or-load cache.

use crate::error::{ForecastError, Result};
use crate::models::{artifact_path, ModelKind, TrainedModel};
use dashmap::DashMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default bound on a single artifact load.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Registry of persisted model artifacts for the serving layer.
///
/// Discovery happens once at construction; loads are lazy, cached, and
/// bounded by a timeout so a corrupted or huge artifact cannot stall
/// requests indefinitely. Entries are published into the cache only
/// after full deserialization, so concurrent first-accesses may load
/// twice but never observe a partially-initialized model; the last
/// writer wins.
#[derive(Debug)]
pub struct ModelRegistry {
    available: HashMap<&'static str, PathBuf>,
    cache: DashMap<&'static str, Arc<TrainedModel>>,
    load_timeout: Duration,
}

impl ModelRegistry {
    /// Scan `dir` for `sales_forecast_<variant>.bin` artifacts.
    pub fn discover(dir: &Path) -> Self {
        Self::discover_with_timeout(dir, DEFAULT_LOAD_TIMEOUT)
    }

    pub fn discover_with_timeout(dir: &Path, load_timeout: Duration) -> Self {
        let mut available = HashMap::new();
        for kind in ModelKind::all() {
            let path = artifact_path(dir, kind);
            if path.exists() {
                debug!(alias = kind.alias(), path = %path.display(), "found model artifact");
                available.insert(kind.alias(), path);
            }
        }
        if available.is_empty() {
            warn!(dir = %dir.display(), "no model artifacts found");
        }

        Self {
            available,
            cache: DashMap::new(),
            load_timeout,
        }
    }

    /// True when no artifact exists for any variant.
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Aliases with an artifact on disk, in serving preference order.
    pub fn available_aliases(&self) -> Vec<&'static str> {
        ModelKind::all()
            .into_iter()
            .map(|k| k.alias())
            .filter(|a| self.available.contains_key(a))
            .collect()
    }

    /// Fetch the cached model for `kind`, loading it on first access.
    pub async fn get_or_load(&self, kind: ModelKind) -> Result<Arc<TrainedModel>> {
        let alias = kind.alias();
        if let Some(model) = self.cache.get(alias) {
            return Ok(Arc::clone(&model));
        }

        let path = self
            .available
            .get(alias)
            .ok_or_else(|| {
                ForecastError::Alignment(format!("no artifact for variant '{alias}'"))
            })?
            .clone();

        let loaded = tokio::time::timeout(
            self.load_timeout,
            tokio::task::spawn_blocking(move || TrainedModel::load(&path)),
        )
        .await
        .map_err(|_| {
            ForecastError::Alignment(format!("loading variant '{alias}' timed out"))
        })?
        .map_err(|e| ForecastError::Alignment(format!("load task for '{alias}' failed: {e}")))??;

        let model = Arc::new(loaded);
        self.cache.insert(alias, Arc::clone(&model));
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MonthlySeries;
    use crate::pipeline::{run_training, TrainingConfig};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn train_rf_into(dir: &Path) {
        let timestamps: Vec<NaiveDate> = (0..18)
            .map(|i| NaiveDate::from_ymd_opt(2016 + i / 12, (i as u32 % 12) + 1, 1).unwrap())
            .collect();
        let values: Vec<f64> = (0..18).map(|i| 500.0 + 10.0 * i as f64).collect();
        let series = MonthlySeries::new(timestamps, values).unwrap();
        run_training(&series, &TrainingConfig::new(ModelKind::RandomForest, dir)).unwrap();
    }

    #[tokio::test]
    async fn discovers_and_loads_trained_artifacts() {
        let dir = tempdir().unwrap();
        train_rf_into(dir.path());

        let registry = ModelRegistry::discover(dir.path());
        assert!(!registry.is_empty());
        assert_eq!(registry.available_aliases(), vec!["rf"]);

        let model = registry.get_or_load(ModelKind::RandomForest).await.unwrap();
        assert_eq!(model.kind(), ModelKind::RandomForest);

        // Second access hits the cache and returns the same instance.
        let again = registry.get_or_load(ModelKind::RandomForest).await.unwrap();
        assert!(Arc::ptr_eq(&model, &again));
    }

    #[tokio::test]
    async fn unknown_variant_is_an_alignment_error() {
        let dir = tempdir().unwrap();
        train_rf_into(dir.path());

        let registry = ModelRegistry::discover(dir.path());
        let err = registry
            .get_or_load(ModelKind::GradientBoosted)
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Alignment(_)));
    }

    #[tokio::test]
    async fn corrupted_artifact_is_reported_not_cached() {
        let dir = tempdir().unwrap();
        let path = artifact_path(dir.path(), ModelKind::RandomForest);
        std::fs::write(&path, b"garbage").unwrap();

        let registry = ModelRegistry::discover(dir.path());
        assert!(!registry.is_empty());
        let err = registry.get_or_load(ModelKind::RandomForest).await.unwrap_err();
        assert!(matches!(err, ForecastError::Persistence(_)));
    }

    #[test]
    fn empty_directory_yields_empty_registry() {
        let dir = tempdir().unwrap();
        let registry = ModelRegistry::discover(dir.path());
        assert!(registry.is_empty());
        assert!(registry.available_aliases().is_empty());
    }
}
