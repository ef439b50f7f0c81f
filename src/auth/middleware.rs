//! Authentication Middleware
//! Mission: Gate the submission endpoints behind bearer-token validation

use crate::auth::{jwt::TokenService, models::Claims};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Pure gating function: extract and verify the bearer token from an
/// `Authorization` header value.
pub fn authenticate(
    header_value: Option<&str>,
    tokens: &TokenService,
) -> Result<Claims, AuthError> {
    let token = header_value
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    tokens.verify(token).map_err(|_| AuthError::InvalidToken)
}

/// Auth middleware that validates bearer tokens.
///
/// Runs before the request body is touched; an unauthenticated submission
/// is rejected without reading a single uploaded byte. On success the
/// claims are inserted into the request extensions for handlers.
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header_value = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let claims = authenticate(header_value, &tokens)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Auth gate failures; all map to 401
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Authentication required",
            AuthError::InvalidToken => "Invalid token",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}
