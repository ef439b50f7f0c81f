//! Submission API Endpoint
//! Mission: Accept multipart evidence uploads from authenticated suppliers

use crate::auth::models::Claims;
use crate::submission::{
    compliance::ComplianceClient, process, Submission, SubmitError, UploadedFile,
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared submission state
#[derive(Clone)]
pub struct SubmissionState {
    pub compliance: Arc<dyn ComplianceClient>,
}

impl SubmissionState {
    pub fn new(compliance: Arc<dyn ComplianceClient>) -> Self {
        Self { compliance }
    }
}

/// Submission endpoint - POST /submit
///
/// Multipart form: `purchaseOrderNumber`, `purchaseOrderLineNumber`, and
/// one or more file parts named `geoJsonFiles`. Runs behind the auth
/// middleware, so claims are always present here.
pub async fn submit(
    State(state): State<SubmissionState>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, SubmitError> {
    let submission = read_multipart(claims, multipart).await?;

    process(&submission, state.compliance.as_ref()).await?;

    Ok(Json(json!({ "message": "Data submitted successfully" })))
}

/// Build a `Submission` from the multipart form. Unknown parts are
/// ignored; field presence is checked downstream by the orchestrator.
async fn read_multipart(
    claims: Claims,
    mut multipart: Multipart,
) -> Result<Submission, SubmitError> {
    let mut purchase_order_number = String::new();
    let mut purchase_order_line_number = String::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| SubmitError::MalformedBody)?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("purchaseOrderNumber") => {
                purchase_order_number =
                    field.text().await.map_err(|_| SubmitError::MalformedBody)?;
            }
            Some("purchaseOrderLineNumber") => {
                purchase_order_line_number =
                    field.text().await.map_err(|_| SubmitError::MalformedBody)?;
            }
            Some("geoJsonFiles") => {
                let filename = field
                    .file_name()
                    .unwrap_or("unnamed")
                    .to_string();
                let bytes = field.bytes().await.map_err(|_| SubmitError::MalformedBody)?;
                files.push(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(Submission {
        purchase_order_number,
        purchase_order_line_number,
        files,
        submitted_by: claims,
    })
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        match self {
            SubmitError::MissingFields => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing required fields" })),
            )
                .into_response(),
            SubmitError::MalformedBody => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Malformed multipart body" })),
            )
                .into_response(),
            SubmitError::InvalidFiles(files) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid GeoJSON file(s)",
                    "files": files,
                })),
            )
                .into_response(),
            SubmitError::UpstreamFailure => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "API submission failed" })),
            )
                .into_response(),
        }
    }
}
