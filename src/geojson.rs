//! GeoJSON Validation
//! Mission: Structural validation of uploaded geolocation evidence
//!
//! Contract-level checks only: a file is accepted when it parses as JSON
//! and carries the FeatureCollection shape. Geometry, coordinate ranges,
//! and CRS are the compliance system's problem, not ours.

use serde_json::Value;

/// Why a file failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// Bytes are not syntactically valid JSON
    ParseError,
    /// Parsed, but not an object with type == "FeatureCollection" and a
    /// features array
    WrongShape,
    /// Filename extension is not .json or .geojson
    BadExtension,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::ParseError => write!(f, "not parseable as JSON"),
            InvalidReason::WrongShape => {
                write!(f, "not a FeatureCollection with a features array")
            }
            InvalidReason::BadExtension => {
                write!(f, "unsupported file extension (expected .json or .geojson)")
            }
        }
    }
}

/// Per-file validation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(InvalidReason),
}

/// Structural validation of raw file bytes.
///
/// Pure function of the input: same bytes, same verdict. Valid iff the
/// bytes parse as a JSON object with `"type": "FeatureCollection"` and a
/// `"features"` array. An empty features array is valid.
pub fn validate(bytes: &[u8]) -> Verdict {
    let value: Value = match serde_json::from_slice(bytes) {
        Ok(v) => v,
        Err(_) => return Verdict::Invalid(InvalidReason::ParseError),
    };

    let is_feature_collection = value
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| t == "FeatureCollection")
        && value.get("features").is_some_and(Value::is_array);

    if is_feature_collection {
        Verdict::Valid
    } else {
        Verdict::Invalid(InvalidReason::WrongShape)
    }
}

/// The portal accepts .json and .geojson uploads (case-insensitive).
pub fn acceptable_extension(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    lower.ends_with(".json") || lower.ends_with(".geojson")
}

/// Full per-upload check: extension rule first, then structural content.
pub fn validate_upload(filename: &str, bytes: &[u8]) -> Verdict {
    if !acceptable_extension(filename) {
        return Verdict::Invalid(InvalidReason::BadExtension);
    }
    validate(bytes)
}
