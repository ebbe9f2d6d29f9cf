// Service identity endpoints — API documentation and health check.
// These carry no decision logic.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

/// GET / — API documentation.
pub async fn home() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Palisade Content Moderation API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/": "API documentation (you are here)",
            "/health": "Health check",
            "/moderate": "POST - Moderate single text",
            "/moderate/batch": "POST - Moderate multiple texts"
        },
        "usage": {
            "/moderate": {
                "method": "POST",
                "body": {
                    "text": "Your text here",
                    "threshold": 0.5
                }
            },
            "/moderate/batch": {
                "method": "POST",
                "body": {
                    "texts": ["Text 1", "Text 2"],
                    "threshold": 0.5
                }
            }
        }
    }))
}

/// GET /health — liveness plus which model is serving.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "model": state.model_name,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
