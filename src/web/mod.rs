// Web server — Axum-based JSON API for the moderation pipeline.
//
// All routes serve JSON. CORS is wide open: the API is meant to be called
// straight from browser frontends, and it carries no credentials or
// sessions to protect.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::moderation::engine::ModerationEngine;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ModerationEngine>,
    /// Model identifier reported by /health
    pub model_name: String,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Palisade moderation API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the moderation API router. Public so the service can be embedded
/// behind another router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::meta::home))
        .route("/health", get(handlers::meta::health))
        .route("/moderate", post(handlers::moderate::moderate_single))
        .route("/moderate/batch", post(handlers::moderate::moderate_batch))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
