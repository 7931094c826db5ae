//! Error types for the sales-forecast crate.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during training and serving.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is malformed or insufficient for the requested run.
    /// Fatal to a training run and reported to the caller.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The requested model variant is not compiled into this build.
    /// Fatal and never retried; distinct from data errors.
    #[error("model variant '{0}' is not available in this build")]
    DependencyUnavailable(String),

    /// Feature-name resolution or prediction failed at serving time.
    /// Recovered locally via the baseline fallback, never surfaced.
    #[error("feature alignment failed: {0}")]
    Alignment(String),

    /// The serving layer has no trained artifact for any variant.
    #[error("no trained models available")]
    NoModelAvailable,

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Saving or loading a persisted artifact failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::Configuration("Order Date column missing".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: Order Date column missing"
        );

        let err = ForecastError::DependencyUnavailable("gbt".to_string());
        assert_eq!(
            err.to_string(),
            "model variant 'gbt' is not available in this build"
        );

        let err = ForecastError::InsufficientData { needed: 4, got: 2 };
        assert_eq!(err.to_string(), "insufficient data: need at least 4, got 2");

        let err = ForecastError::NoModelAvailable;
        assert_eq!(err.to_string(), "no trained models available");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::NoModelAvailable;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
