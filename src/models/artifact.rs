//! Persisted model artifacts.
//!
//! A trained run produces one artifact per variant: the fitted estimator
//! plus the ordered feature names it was trained with. The name list is
//! the sole contract the serving-time aligner consumes.

use crate::error::{ForecastError, Result};
use crate::models::{FittedModel, ModelKind};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// File-name prefix for artifacts: `sales_forecast_<variant>.bin`.
pub const ARTIFACT_PREFIX: &str = "sales_forecast_";

/// Artifact format version, bumped on layout changes. A mismatch on load
/// is a persistence error, not silent misbehavior.
const FORMAT_VERSION: u32 = 1;

/// A fitted estimator together with its training-time metadata.
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    kind: ModelKind,
    feature_names: Vec<String>,
    model: FittedModel,
}

impl TrainedModel {
    pub fn new(kind: ModelKind, feature_names: Vec<String>, model: FittedModel) -> Self {
        Self {
            kind,
            feature_names,
            model,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Ordered feature names captured at fit time. May be empty when the
    /// estimator exposes none; the aligner then falls back to the fixed
    /// three-lag layout.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    /// Serialize to `path` as a version-prefixed bincode blob.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| ForecastError::Persistence(format!("create {}: {e}", path.display())))?;
        let mut writer = BufWriter::new(file);

        writer
            .write_all(&FORMAT_VERSION.to_le_bytes())
            .map_err(|e| ForecastError::Persistence(format!("write {}: {e}", path.display())))?;
        bincode::serialize_into(&mut writer, self)
            .map_err(|e| ForecastError::Persistence(format!("encode {}: {e}", path.display())))?;
        writer
            .flush()
            .map_err(|e| ForecastError::Persistence(format!("write {}: {e}", path.display())))
    }

    /// Load an artifact written by [`TrainedModel::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| ForecastError::Persistence(format!("open {}: {e}", path.display())))?;
        let mut reader = BufReader::new(file);

        let mut version = [0u8; 4];
        reader
            .read_exact(&mut version)
            .map_err(|e| ForecastError::Persistence(format!("read {}: {e}", path.display())))?;
        let version = u32::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(ForecastError::Persistence(format!(
                "artifact format version {version} (expected {FORMAT_VERSION})"
            )));
        }

        bincode::deserialize_from(&mut reader)
            .map_err(|e| ForecastError::Persistence(format!("decode {}: {e}", path.display())))
    }
}

/// Deterministic artifact path for a variant under `dir`.
pub fn artifact_path(dir: &Path, kind: ModelKind) -> PathBuf {
    dir.join(format!("{ARTIFACT_PREFIX}{}.bin", kind.alias()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RandomForestRegressor, Regressor};
    use tempfile::tempdir;

    fn fitted_forest() -> TrainedModel {
        let features: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|i| 2.0 * i as f64).collect();
        let mut rf = RandomForestRegressor::new(10, 42);
        rf.fit(&features, &targets).unwrap();
        TrainedModel::new(
            ModelKind::RandomForest,
            vec!["lag_1".to_string()],
            FittedModel::RandomForest(rf),
        )
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = artifact_path(dir.path(), ModelKind::RandomForest);
        assert!(path.ends_with("sales_forecast_rf.bin"));

        let trained = fitted_forest();
        trained.save(&path).unwrap();

        let loaded = TrainedModel::load(&path).unwrap();
        assert_eq!(loaded.kind(), ModelKind::RandomForest);
        assert_eq!(loaded.feature_names(), trained.feature_names());

        let row = vec![vec![4.0]];
        assert_eq!(
            loaded.model().predict(&row).unwrap(),
            trained.model().predict(&row).unwrap()
        );
    }

    #[test]
    fn version_mismatch_is_a_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, 99u32.to_le_bytes()).unwrap();

        let err = TrainedModel::load(&path).unwrap_err();
        assert!(matches!(err, ForecastError::Persistence(_)));
    }

    #[test]
    fn truncated_artifact_is_a_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();

        let err = TrainedModel::load(&path).unwrap_err();
        assert!(matches!(err, ForecastError::Persistence(_)));
    }

    #[test]
    fn missing_file_is_a_persistence_error() {
        let err = TrainedModel::load(Path::new("/nonexistent/model.bin")).unwrap_err();
        assert!(matches!(err, ForecastError::Persistence(_)));
    }
}
