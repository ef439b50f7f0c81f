//! Runtime Configuration
//! Mission: Collect environment configuration once at startup

use anyhow::{Context, Result};

/// Process-wide configuration, read from the environment at startup.
pub struct Config {
    pub port: u16,
    /// Token signing secret; fixed for the process lifetime
    pub jwt_secret: String,
    /// When set, credentials live in SQLite at this path instead of memory
    pub auth_db_path: Option<String>,
    /// When unset, accepted submissions are logged instead of forwarded
    pub compliance_api_url: Option<String>,
    pub compliance_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .context("JWT_SECRET must be set to a non-empty value")?;

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let auth_db_path = std::env::var("AUTH_DB_PATH").ok();

        let compliance_api_url = std::env::var("COMPLIANCE_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let compliance_timeout_secs = std::env::var("COMPLIANCE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".to_string())
            .parse()
            .unwrap_or(10 * 1024 * 1024);

        Ok(Self {
            port,
            jwt_secret,
            auth_db_path,
            compliance_api_url,
            compliance_timeout_secs,
            max_upload_bytes,
        })
    }
}
