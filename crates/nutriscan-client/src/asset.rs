//! Image host seam
//!
//! The scan flow uploads the label photo to a third-party host first and
//! only sends the resulting URL to the backend.

use async_trait::async_trait;
use nutriscan_types::ImageBlob;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

use crate::{TransportError, UploadError};

/// Uploads an image and returns a durable, publicly reachable URL
#[async_trait]
pub trait AssetHost: Send + Sync {
    async fn upload(&self, image: &ImageBlob) -> Result<String, UploadError>;
}

/// Cloudinary unsigned upload (`upload_preset`, no API secret on the client)
#[derive(Clone)]
pub struct CloudinaryHost {
    client: reqwest::Client,
    upload_base: String,
    cloud_name: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

impl CloudinaryHost {
    pub const DEFAULT_UPLOAD_BASE: &'static str = "https://api.cloudinary.com/v1_1";

    pub fn new(
        upload_base: &str,
        cloud_name: &str,
        upload_preset: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            client,
            upload_base: upload_base.trim_end_matches('/').to_string(),
            cloud_name: cloud_name.to_string(),
            upload_preset: upload_preset.to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}/image/upload", self.upload_base, self.cloud_name)
    }
}

#[async_trait]
impl AssetHost for CloudinaryHost {
    async fn upload(&self, image: &ImageBlob) -> Result<String, UploadError> {
        let format = image
            .format()
            .ok_or_else(|| UploadError::UnsupportedImage {
                file_name: image.file_name.clone(),
                content_type: image.content_type.clone(),
            })?;

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(format.mime_type())
            .map_err(TransportError::from)?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let endpoint = self.endpoint();
        tracing::debug!("Uploading {} ({} bytes) to {}", image.file_name, image.len(), endpoint);

        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(TransportError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(TransportError::from)?;
        let parsed: Option<UploadResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|p| p.error)
                .map(|e| e.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        parsed
            .and_then(|p| p.secure_url)
            .filter(|url| !url.is_empty())
            .ok_or(UploadError::MissingUrl)
    }
}
