//! Authentication API Endpoints
//! Mission: Provide registration and login for suppliers

use crate::auth::{
    jwt::TokenService,
    models::{
        Claims, IdentityResponse, LoginRequest, LoginResponse, RegisterRequest,
    },
    store::{CredentialStore, RegisterError},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub store: Arc<dyn CredentialStore>,
    pub tokens: Arc<TokenService>,
}

impl AuthState {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }
}

/// Registration endpoint - POST /register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AuthApiError> {
    if payload.handle.trim().is_empty() || payload.password.is_empty() {
        return Err(AuthApiError::MissingCredentials);
    }

    state
        .store
        .register(payload.handle.trim(), &payload.password)
        .map_err(|e| match e {
            RegisterError::DuplicateHandle => {
                warn!("❌ Registration rejected, handle taken: {}", payload.handle);
                AuthApiError::DuplicateHandle
            }
            RegisterError::Store(err) => {
                warn!("Credential store failure during registration: {}", err);
                AuthApiError::InternalError
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    info!("🔐 Login attempt: {}", payload.handle);

    // Unknown handle and wrong password produce the same response, so the
    // login endpoint cannot be used to enumerate accounts.
    let identity = state
        .store
        .find_by_handle(payload.handle.trim())
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or(AuthApiError::InvalidCredentials)?;

    let valid = state
        .store
        .verify_password(&identity, &payload.password)
        .map_err(|_| AuthApiError::InternalError)?;

    if !valid {
        warn!("❌ Failed login attempt: {}", payload.handle);
        return Err(AuthApiError::InvalidCredentials);
    }

    let (token, expires_in) = state
        .tokens
        .issue(&identity)
        .map_err(|_| AuthApiError::InternalError)?;

    info!("✅ Login successful: {}", identity.handle);

    Ok(Json(LoginResponse { token, expires_in }))
}

/// Current identity - GET /me
///
/// Built entirely from the verified token claims; no store lookup.
pub async fn me(Extension(claims): Extension<Claims>) -> Json<IdentityResponse> {
    Json(IdentityResponse::from_claims(&claims))
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    MissingCredentials,
    DuplicateHandle,
    InvalidCredentials,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, "Handle and password are required")
            }
            AuthApiError::DuplicateHandle => (StatusCode::BAD_REQUEST, "duplicate handle"),
            AuthApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid credentials"),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryCredentialStore;

    fn test_state() -> AuthState {
        AuthState::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(TokenService::new("test-secret-key-12345".to_string())),
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = test_state();

        let (status, _) = register(
            State(state.clone()),
            Json(RegisterRequest {
                handle: "supplier1".to_string(),
                password: "password123".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let response = login(
            State(state.clone()),
            Json(LoginRequest {
                handle: "supplier1".to_string(),
                password: "password123".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(!response.token.is_empty());
        assert_eq!(response.expires_in, 3600);

        // The issued token verifies against the same service
        let claims = state.tokens.verify(&response.token).unwrap();
        assert_eq!(claims.handle, "supplier1");
    }

    #[tokio::test]
    async fn test_register_duplicate_handle() {
        let state = test_state();

        let payload = || RegisterRequest {
            handle: "supplier1".to_string(),
            password: "password123".to_string(),
        };

        register(State(state.clone()), Json(payload())).await.unwrap();
        let second = register(State(state), Json(payload())).await;
        assert!(matches!(second, Err(AuthApiError::DuplicateHandle)));
    }

    #[tokio::test]
    async fn test_register_empty_fields_rejected() {
        let state = test_state();

        let result = register(
            State(state.clone()),
            Json(RegisterRequest {
                handle: "  ".to_string(),
                password: "password123".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AuthApiError::MissingCredentials)));

        let result = register(
            State(state),
            Json(RegisterRequest {
                handle: "supplier1".to_string(),
                password: String::new(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AuthApiError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_and_wrong_password_look_identical() {
        let state = test_state();

        register(
            State(state.clone()),
            Json(RegisterRequest {
                handle: "supplier1".to_string(),
                password: "password123".to_string(),
            }),
        )
        .await
        .unwrap();

        let unknown = login(
            State(state.clone()),
            Json(LoginRequest {
                handle: "ghost".to_string(),
                password: "password123".to_string(),
            }),
        )
        .await;
        let wrong = login(
            State(state),
            Json(LoginRequest {
                handle: "supplier1".to_string(),
                password: "wrongpassword".to_string(),
            }),
        )
        .await;

        assert!(matches!(unknown, Err(AuthApiError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AuthApiError::InvalidCredentials)));
    }

    #[test]
    fn test_auth_api_error_responses() {
        let duplicate = AuthApiError::DuplicateHandle.into_response();
        assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

        let invalid = AuthApiError::InvalidCredentials.into_response();
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);

        let internal = AuthApiError::InternalError.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
