//! Prediction API: routes, the per-request serving guard, and CORS setup.

mod registry;

pub use registry::{ModelRegistry, DEFAULT_LOAD_TIMEOUT};

use crate::baseline::linear_fallback;
use crate::error::{ForecastError, Result};
use crate::features::align_features;
use crate::models::ModelKind;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Shared state for the serving layer.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/models", get(list_models))
        .route("/predict", get(predict))
        .with_state(state)
}

/// Permissive-by-default CORS layer driven by the `CORS_ORIGINS`
/// environment variable (comma-separated origins; unset allows any).
pub fn cors_from_env() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    }
    .allow_methods(Any)
    .allow_headers(Any)
}

#[derive(Debug, Serialize)]
struct BannerResponse {
    message: &'static str,
    available_models: Vec<&'static str>,
}

async fn root(State(state): State<AppState>) -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "sales forecast API running",
        available_models: state.registry.available_aliases(),
    })
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
struct ModelsResponse {
    available_models: Vec<&'static str>,
}

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        available_models: state.registry.available_aliases(),
    })
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    lag1: f64,
    lag2: f64,
    lag3: f64,
    #[serde(default = "default_model")]
    model: String,
    month: Option<u32>,
}

fn default_model() -> String {
    "rf".to_string()
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    prediction: f64,
    model: String,
    used_month: u32,
    fallback: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

/// Per-request serving guard.
///
/// Attempts the model prediction and downgrades any failure on that path
/// (unknown alias, load timeout, malformed artifact, estimator error) to
/// the fixed linear fallback, still answering 200. The only surfaced
/// failure is the registry holding no artifact for any variant.
async fn predict(
    State(state): State<AppState>,
    Query(params): Query<PredictParams>,
) -> Response {
    if state.registry.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                detail: format!("{}; run a training job first", ForecastError::NoModelAvailable),
            }),
        )
            .into_response();
    }

    if let Some(month) = params.month {
        if !(1..=12).contains(&month) {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    detail: format!("month must be in 1..=12, got {month}"),
                }),
            )
                .into_response();
        }
    }
    let month = params.month.unwrap_or_else(next_month);

    let lags = [params.lag1, params.lag2, params.lag3];
    let (prediction, fallback) = match attempt_model(&state, &params.model, lags, month).await {
        Ok(value) => (value, false),
        Err(err) => {
            warn!(model = %params.model, %err, "model path failed, using baseline fallback");
            (linear_fallback(params.lag1, params.lag2, params.lag3), true)
        }
    };

    Json(PredictResponse {
        prediction: round2(prediction),
        model: params.model,
        used_month: month,
        fallback,
    })
    .into_response()
}

async fn attempt_model(state: &AppState, alias: &str, lags: [f64; 3], month: u32) -> Result<f64> {
    let kind: ModelKind = alias.parse()?;
    let trained = state.registry.get_or_load(kind).await?;
    let row = align_features(lags, month, trained.feature_names());
    trained.model().predict_one(&row)
}

/// Calendar month following the current UTC month.
fn next_month() -> u32 {
    (Utc::now().month() % 12) + 1
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
