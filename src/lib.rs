//! EUDR Supplier Portal Backend Library
//!
//! Exposes the submission pipeline for the server binary and tests:
//! credential storage, token issuing/verification, the auth gate,
//! GeoJSON structural validation, and the submission orchestrator.

pub mod auth;
pub mod config;
pub mod geojson;
pub mod middleware;
pub mod routes;
pub mod submission;
