//! Submission Module
//! Mission: Validate and forward geolocation evidence for purchase-order lines

pub mod api;
pub mod compliance;

use crate::auth::models::Claims;
use crate::geojson::{self, Verdict};
use compliance::ComplianceClient;
use serde::Serialize;
use tracing::{info, warn};

pub use api::SubmissionState;

/// One uploaded evidence file
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One submission: a purchase-order line plus its evidence files and the
/// authenticated supplier. Built and validated once at the HTTP boundary,
/// trusted internally, never persisted.
#[derive(Debug, Clone)]
pub struct Submission {
    pub purchase_order_number: String,
    pub purchase_order_line_number: String,
    pub files: Vec<UploadedFile>,
    pub submitted_by: Claims,
}

/// An invalid file and why, as reported back to the supplier
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InvalidFile {
    pub file: String,
    pub reason: String,
}

/// Submission failures
#[derive(Debug)]
pub enum SubmitError {
    /// Order fields empty/absent, or no files attached
    MissingFields,
    /// Request body could not be parsed as a multipart form
    MalformedBody,
    /// At least one file failed validation; every offender is named
    InvalidFiles(Vec<InvalidFile>),
    /// The compliance collaborator failed or timed out
    UpstreamFailure,
}

/// Process one submission: field checks, per-file validation, then a
/// single forward to the compliance collaborator.
///
/// Files are validated independently and every invalid file is collected,
/// so the supplier sees the full list of offenders in one round trip. The
/// collaborator is called at most once and never before all files pass.
pub async fn process(
    submission: &Submission,
    compliance: &dyn ComplianceClient,
) -> Result<(), SubmitError> {
    if submission.purchase_order_number.trim().is_empty()
        || submission.purchase_order_line_number.trim().is_empty()
        || submission.files.is_empty()
    {
        return Err(SubmitError::MissingFields);
    }

    let invalid: Vec<InvalidFile> = submission
        .files
        .iter()
        .filter_map(|f| match geojson::validate_upload(&f.filename, &f.bytes) {
            Verdict::Valid => None,
            Verdict::Invalid(reason) => Some(InvalidFile {
                file: f.filename.clone(),
                reason: reason.to_string(),
            }),
        })
        .collect();

    if !invalid.is_empty() {
        return Err(SubmitError::InvalidFiles(invalid));
    }

    compliance.forward(submission).await.map_err(|e| {
        warn!(
            "Compliance forward failed for PO {} line {}: {}",
            submission.purchase_order_number, submission.purchase_order_line_number, e
        );
        SubmitError::UpstreamFailure
    })?;

    info!(
        "✅ Submission accepted: PO {} line {}, {} file(s), supplier {}",
        submission.purchase_order_number,
        submission.purchase_order_line_number,
        submission.files.len(),
        submission.submitted_by.handle
    );

    Ok(())
}
