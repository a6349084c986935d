//! reqwest-backed [`BackendTransport`]

use async_trait::async_trait;
use std::time::Duration;

use crate::{ApiRequest, ApiResponse, BackendTransport, Method, Result, TransportError};

/// HTTP client for the backend API
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl BackendTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        tracing::debug!("{} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!("{} {} -> HTTP {}", request.method, url, status);
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining_ignores_duplicate_slashes() {
        let transport = HttpTransport::new("http://localhost:8000/api/", Duration::from_secs(5))
            .unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000/api");
        assert_eq!(
            transport.url("/auth/login"),
            "http://localhost:8000/api/auth/login"
        );
        assert_eq!(
            transport.url("nutrition/logs/2024-01-02"),
            "http://localhost:8000/api/nutrition/logs/2024-01-02"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        // Port 9 (discard) is essentially never listening on loopback
        let transport =
            HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = transport.send(ApiRequest::get("/auth/validate")).await;
        assert!(result.is_err());
    }
}
