// Moderation endpoints.
//
// POST /moderate       — single text
// POST /moderate/batch — multiple texts plus aggregate statistics
//
// Validation failures are 400s and never reach the engine; classifier
// failures surface as 500s with the adapter's message. A batch aborts as
// a whole on the first classifier failure — no partial results.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::validate;
use crate::web::{api_error, AppState};

/// POST /moderate — classify one text against the caller's threshold.
pub async fn moderate_single(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Response {
    let request = match validate::parse_single(&payload) {
        Ok(request) => request,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    match state.engine.moderate(&request.text, request.threshold).await {
        Ok(verdict) => Json(serde_json::json!({
            "success": true,
            "result": verdict,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Classifier failure on /moderate");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// POST /moderate/batch — classify several texts and aggregate.
pub async fn moderate_batch(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Response {
    let request = match validate::parse_batch(&payload) {
        Ok(request) => request,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    match state
        .engine
        .moderate_batch(&request.texts, request.threshold)
        .await
    {
        Ok((verdicts, stats)) => Json(serde_json::json!({
            "success": true,
            "results": verdicts,
            "statistics": stats,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Classifier failure on /moderate/batch");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}
