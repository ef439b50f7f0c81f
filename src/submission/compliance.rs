//! Compliance Collaborator Client
//! Mission: Forward accepted submissions to the external compliance system

use crate::submission::Submission;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Outbound seam to the compliance system.
///
/// Called at most once per submission, only after every file validated.
/// No retries and no idempotency assumption; a failed or timed-out call
/// rejects that one submission and nothing else.
#[async_trait]
pub trait ComplianceClient: Send + Sync {
    async fn forward(&self, submission: &Submission) -> Result<()>;
}

/// HTTP client for a real compliance endpoint.
pub struct HttpComplianceClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpComplianceClient {
    pub fn new(http: reqwest::Client, url: String, timeout: Duration) -> Self {
        Self { http, url, timeout }
    }
}

#[async_trait]
impl ComplianceClient for HttpComplianceClient {
    async fn forward(&self, submission: &Submission) -> Result<()> {
        // Files already passed structural validation, so each one embeds
        // as a JSON value rather than an opaque blob.
        let mut files = Vec::with_capacity(submission.files.len());
        for f in &submission.files {
            let geo_json: serde_json::Value = serde_json::from_slice(&f.bytes)
                .with_context(|| format!("File {} is not valid JSON", f.filename))?;
            files.push(json!({
                "filename": f.filename,
                "geoJson": geo_json,
            }));
        }

        let body = json!({
            "purchaseOrderNumber": submission.purchase_order_number,
            "purchaseOrderLineNumber": submission.purchase_order_line_number,
            "submittedBy": submission.submitted_by.handle,
            "files": files,
        });

        let resp = self
            .http
            .post(&self.url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("Compliance API request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Compliance API returned {}", resp.status());
        }

        Ok(())
    }
}

/// Stand-in collaborator used when no compliance endpoint is configured;
/// accepts everything and logs what would have been sent.
pub struct StubComplianceClient;

#[async_trait]
impl ComplianceClient for StubComplianceClient {
    async fn forward(&self, submission: &Submission) -> Result<()> {
        info!(
            "📦 Submitted: PO {}, Line {}, Files: {}",
            submission.purchase_order_number,
            submission.purchase_order_line_number,
            submission.files.len()
        );
        Ok(())
    }
}
