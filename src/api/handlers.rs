use axum::{
    extract::rejection::JsonRejection, extract::State, http::StatusCode, response::IntoResponse,
    response::Response, Json,
};
use serde_json::Value;
use tracing::{error, warn};

use crate::api::{state::AppState, types::*};
use crate::domain::{EcgSample, ECG_CONDITIONS};
use crate::error::EcgdError;
use crate::model::onnx::MODEL_INPUT_SHAPE;

/// Client-facing error: status code plus a `{"error": ...}` body.
///
/// Internal failures are logged server-side and collapsed to a generic
/// message so engine details never leak to callers.
#[derive(Debug)]
pub struct ApiError(pub StatusCode, pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorBody { error: self.1 })).into_response()
    }
}

impl From<EcgdError> for ApiError {
    fn from(err: EcgdError) -> Self {
        match err {
            EcgdError::Validation(msg) => {
                warn!("rejected predict request: {msg}");
                ApiError(StatusCode::BAD_REQUEST, msg)
            }
            EcgdError::ModelUnavailable => {
                ApiError(StatusCode::SERVICE_UNAVAILABLE, "model unavailable".to_string())
            }
            other => {
                error!("prediction failed: {other}");
                ApiError(StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        }
    }
}

fn no_data() -> ApiError {
    ApiError(StatusCode::BAD_REQUEST, "No ECG data provided".to_string())
}

/// POST /api/predict
pub async fn predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    // Body-level failures keep the `{"error": ...}` shape; the parser
    // detail stays in the server log.
    let Json(req) = payload.map_err(|rejection| {
        warn!("rejected predict request body: {rejection}");
        ApiError(
            StatusCode::BAD_REQUEST,
            "malformed JSON in request body".to_string(),
        )
    })?;

    let ecg_data = match req.ecg_data.as_ref() {
        None | Some(Value::Null) => return Err(no_data()),
        Some(Value::Array(rows)) if rows.is_empty() => return Err(no_data()),
        Some(value) => value,
    };

    let sample = EcgSample::from_json(ecg_data)?;

    let model = state.model.as_ref().ok_or(EcgdError::ModelUnavailable)?;
    let scores = model.scores(sample.as_slice())?;
    let record = PredictionRecord::from_scores(&scores)?;

    Ok(Json(PredictResponse {
        predictions: vec![record],
        message: "Analysis complete using trained model".to_string(),
    }))
}

/// GET /api/model-info
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    if state.model.is_some() {
        Json(ModelInfoResponse {
            status: "loaded".to_string(),
            input_shape: Some(format!(
                "({}, {}, {})",
                MODEL_INPUT_SHAPE[0], MODEL_INPUT_SHAPE[1], MODEL_INPUT_SHAPE[2]
            )),
            output_conditions: Some(ECG_CONDITIONS.iter().map(|s| s.to_string()).collect()),
            model_summary: Some("Trained ECG classification model".to_string()),
            message: None,
        })
    } else {
        Json(ModelInfoResponse {
            status: "not_loaded".to_string(),
            input_shape: None,
            output_conditions: None,
            model_summary: None,
            message: Some("model is not loaded; predictions are unavailable".to_string()),
        })
    }
}

/// GET /health -- lightweight liveness/readiness probe
pub async fn health(
    State(state): State<AppState>,
) -> std::result::Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let loaded = state.model.is_some();
    let resp = HealthResponse {
        status: if loaded {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        model: if loaded {
            "loaded".to_string()
        } else {
            "not_loaded".to_string()
        },
        uptime_secs: state.uptime_seconds(),
    };

    if loaded {
        Ok(Json(resp))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(resp)))
    }
}
