use axum::body::Bytes;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{PredictionOutput, PredictionRequest};
use crate::predictor::LocalPredictor;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body is parsed as JSON whatever the declared content type.
pub async fn predict(
    body: Bytes,
) -> Result<Json<PredictionOutput>, (StatusCode, Json<ErrorResponse>)> {
    let request: PredictionRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("[phishguard] Rejected prediction request: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid JSON body: {}", e),
            }),
        )
    })?;

    let output = LocalPredictor::score(&request.url);
    info!(
        "[phishguard] Scored {:?}: probability {:.3}, label {}",
        output.url, output.phishing_probability, output.label
    );
    Ok(Json(output))
}
