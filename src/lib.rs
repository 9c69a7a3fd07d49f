//! URL phishing risk checker: feature extraction, heuristic scoring, and the
//! predict-and-render UI served over HTTP.

pub mod config;
pub mod features;
pub mod handlers;
pub mod models;
pub mod predictor;
pub mod scorer;
pub mod state;
pub mod templates;
pub mod ui;

use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower::buffer::BufferLayer;
use tower::limit::RateLimitLayer;
use tower::load_shed::LoadShedLayer;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::predictor::PREDICT_PATH;
use crate::state::AppState;

/// Requests per minute accepted on the prediction endpoint.
pub const PREDICT_RATE_LIMIT: u64 = 60;

pub fn router(state: AppState) -> Router {
    let cors = if let Some(ref origins) = state.config.cors_origins {
        let origins: Vec<_> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let predict_rate_limit = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|_: tower::BoxError| async {
            StatusCode::TOO_MANY_REQUESTS
        }))
        .layer(BufferLayer::new(64))
        // Sheds instead of queueing once the per-minute budget is spent.
        .layer(LoadShedLayer::new())
        .layer(RateLimitLayer::new(PREDICT_RATE_LIMIT, Duration::from_secs(60)));

    Router::new()
        .route("/", get(index))
        .route("/health", get(handlers::health::health))
        .route(
            PREDICT_PATH,
            post(handlers::predict::predict).layer(predict_rate_limit),
        )
        .route("/check", get(handlers::check::check))
        .layer(cors)
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(templates::page::landing(state.config.static_dir.as_deref()))
}
