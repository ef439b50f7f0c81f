//! EUDR Supplier Portal Backend
//! Mission: Authenticated intake of geolocation evidence for purchase-order lines

use anyhow::{Context, Result};
use eudr_portal_backend::{
    auth::{
        AuthState, CredentialStore, MemoryCredentialStore, SqliteCredentialStore, TokenService,
    },
    config::Config,
    routes::build_router,
    submission::{
        compliance::{ComplianceClient, HttpComplianceClient, StubComplianceClient},
        SubmissionState,
    },
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    info!("🚀 EUDR Supplier Portal backend starting");

    let store: Arc<dyn CredentialStore> = match &config.auth_db_path {
        Some(path) => {
            info!("🔐 Credential store: SQLite at {}", path);
            Arc::new(SqliteCredentialStore::new(path)?)
        }
        None => {
            info!("🔐 Credential store: in-memory (accounts are ephemeral)");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    let tokens = Arc::new(TokenService::new(config.jwt_secret.clone()));
    let auth_state = AuthState::new(store, tokens);

    let timeout = Duration::from_secs(config.compliance_timeout_secs);
    let compliance: Arc<dyn ComplianceClient> = match &config.compliance_api_url {
        Some(url) => {
            let http_client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build HTTP client")?;
            info!("📡 Compliance endpoint: {}", url);
            Arc::new(HttpComplianceClient::new(http_client, url.clone(), timeout))
        }
        None => {
            info!("📡 No compliance endpoint configured, accepted submissions are logged only");
            Arc::new(StubComplianceClient)
        }
    };
    let submission_state = SubmissionState::new(compliance);

    let app = build_router(auth_state, submission_state, config.max_upload_bytes);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
