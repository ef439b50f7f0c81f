//! Router Assembly
//! Mission: Wire the portal's HTTP surface

use crate::auth::{api as auth_api, auth_middleware, AuthState};
use crate::middleware::request_logging;
use crate::submission::{api as submission_api, SubmissionState};
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

/// Create the portal router.
///
/// `/register`, `/login`, and `/health` are public; `/submit` and `/me`
/// sit behind the bearer-token middleware, and the upload body limit is
/// scoped to that protected router.
pub fn build_router(
    auth_state: AuthState,
    submission_state: SubmissionState,
    max_upload_bytes: usize,
) -> Router {
    let tokens = auth_state.tokens.clone();

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/register", post(auth_api::register))
        .route("/login", post(auth_api::login))
        .with_state(auth_state);

    let protected_routes = Router::new()
        .route("/submit", post(submission_api::submit))
        .route("/me", get(auth_api::me))
        .route_layer(from_fn_with_state(tokens, auth_middleware))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(submission_state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
