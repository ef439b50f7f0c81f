//! Authentication Models
//! Mission: Define secure supplier account and token data structures

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered supplier account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    /// Login handle (username or email), unique across all identities
    pub handle: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub created_at: String,
}

/// JWT Claims payload
///
/// Self-contained: verification never goes back to the credential store,
/// so a token stays valid for its full hour even if the account is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (identity id)
    pub handle: String,
    pub iat: usize, // issued-at timestamp
    pub exp: usize, // expiration timestamp
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub handle: String,
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub handle: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: usize, // seconds until expiration
}

/// Identity response for /me (built from token claims, sanitized)
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub id: String,
    pub handle: String,
    pub token_expires: usize,
}

impl IdentityResponse {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            handle: claims.handle.clone(),
            token_expires: claims.exp,
        }
    }
}
