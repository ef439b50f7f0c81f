//! JWT Token Service
//! Mission: Issue and verify bearer tokens securely

use crate::auth::models::{Claims, Identity};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Tokens live for exactly one hour.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Token service for issue/verify operations.
///
/// The signing secret is fixed for the process lifetime; rotating it
/// invalidates every outstanding token.
pub struct TokenService {
    secret: String,
}

impl TokenService {
    /// Create a new token service with the signing secret
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issue a signed token for an identity, returning the token string
    /// and its lifetime in seconds.
    pub fn issue(&self, identity: &Identity) -> Result<(String, usize)> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::seconds(TOKEN_TTL_SECS))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: identity.id.to_string(),
            handle: identity.handle.clone(),
            iat: now.timestamp() as usize,
            exp: expiration,
        };

        debug!(
            "Issuing token for {} ({}), expires in {}s",
            identity.handle, identity.id, TOKEN_TTL_SECS
        );

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")?;

        Ok((token, TOKEN_TTL_SECS as usize))
    }

    /// Verify a token string and extract its claims.
    ///
    /// Fails on signature mismatch, malformed payload, or expiry. The
    /// claims are returned as embedded in the token; they are not checked
    /// against the credential store.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        // The library default tolerates 60s of clock drift; expiry here is
        // an exact bound.
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .context("Invalid or expired token")?;

        // exp is exclusive: a token presented at its expiry instant is
        // already dead.
        if Utc::now().timestamp() as usize >= decoded.claims.exp {
            anyhow::bail!("Token expired");
        }

        debug!("Verified token for {}", decoded.claims.handle);

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn create_test_identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            handle: "supplier1".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    fn token_with_exp(service_secret: &str, exp: usize) -> String {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            handle: "supplier1".to_string(),
            iat: exp.saturating_sub(TOKEN_TTL_SECS as usize),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(service_secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new("test-secret-key-12345".to_string());
        let identity = create_test_identity();

        let (token, expires_in) = service.issue(&identity).unwrap();
        assert!(!token.is_empty());
        assert_eq!(expires_in, 3600);

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, identity.id.to_string());
        assert_eq!(claims.handle, identity.handle);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = TokenService::new("test-secret-key-12345".to_string());

        assert!(service.verify("not.a.token").is_err());
        assert!(service.verify("").is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let service1 = TokenService::new("secret1".to_string());
        let service2 = TokenService::new("secret2".to_string());
        let identity = create_test_identity();

        let (token, _) = service1.issue(&identity).unwrap();
        assert!(service2.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let secret = "test-secret-key-12345";
        let service = TokenService::new(secret.to_string());

        let past = (Utc::now().timestamp() - 120) as usize;
        let token = token_with_exp(secret, past);
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_token_rejected_at_exact_expiry_instant() {
        let secret = "test-secret-key-12345";
        let service = TokenService::new(secret.to_string());

        let now = Utc::now().timestamp() as usize;
        let token = token_with_exp(secret, now);
        assert!(service.verify(&token).is_err());
    }
}
