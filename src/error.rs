//! Error handling for the NutriScan client core
//!
//! Network and backend failures never show up here: the gateways fold them
//! into `AuthResult` / `NutritionResult`. These types cover configuration,
//! durable credential storage, and the scan workflow.

use std::path::PathBuf;

use nutriscan_client::{TransportError, UploadError};
use thiserror::Error;

use crate::validation::FieldError;

/// Umbrella error for wiring and startup
#[derive(Error, Debug)]
pub enum NutriError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Credential store error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Durable credential storage errors
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt credential file: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Credential expiry out of range (ttl {ttl_secs}s)")]
    ExpiryOutOfRange { ttl_secs: i64 },
}

/// Scan workflow errors
///
/// Precondition failures (no image, no user) are not errors: `submit`
/// returns `SubmitOutcome::Skipped` for those.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Unsupported image type '{content_type}' for {file_name}")]
    UnsupportedImage {
        file_name: String,
        content_type: String,
    },

    #[error("A scan is already in progress")]
    Busy,

    #[error("Invalid scan form: {}", format_field_errors(.0))]
    Invalid(Vec<FieldError>),

    #[error("Failed to upload image")]
    Upload(#[source] UploadError),

    #[error("Failed to analyze food label: {0}")]
    Analysis(String),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
