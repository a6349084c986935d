//! Transport and upload errors
//!
//! These never reach the UI directly: the gateways in the core crate fold
//! them into `AuthResult` / `NutritionResult` failures.

use thiserror::Error;

/// No HTTP response could be obtained for a request
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else if error.is_builder() {
            TransportError::Config(error.to_string())
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

/// The image host did not give back a durable URL
#[derive(Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Image host rejected the upload (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Image host response did not contain a secure_url")]
    MissingUrl,

    #[error("Unsupported image type '{content_type}' for {file_name}")]
    UnsupportedImage {
        file_name: String,
        content_type: String,
    },
}
