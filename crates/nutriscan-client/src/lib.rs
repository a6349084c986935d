//! NutriScan client - the API boundary between the client core and the
//! outside world.
//!
//! Two seams:
//! - [`BackendTransport`]: raw request/response exchange with the backend API.
//!   [`HttpTransport`] is the reqwest implementation. It reports status codes
//!   and bodies as-is; normalising them into results is the caller's job.
//! - [`AssetHost`]: image upload returning a durable URL. [`CloudinaryHost`]
//!   is the unsigned-preset implementation.

pub mod asset;
pub mod error;
pub mod http;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

pub use asset::{AssetHost, CloudinaryHost};
pub use error::{TransportError, UploadError};
pub use http::HttpTransport;

pub type Result<T> = std::result::Result<T, TransportError>;

/// HTTP verbs used by the backend API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// A single backend call, relative to the transport's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Bearer credential sent as `Authorization`
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
            bearer: None,
        })
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Human-readable error text from a JSON body.
    ///
    /// Looks at `message` first, then a FastAPI-style string `detail`.
    pub fn error_message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        ["message", "detail"]
            .iter()
            .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|m| !m.is_empty())
            .map(str::to_string)
    }
}

/// Raw exchange with the backend API.
///
/// Implementations return `Err` only when no HTTP response was obtained
/// (connect failure, timeout, encoding). Any status code is an `Ok`.
#[async_trait]
pub trait BackendTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(301, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
        assert!(!ApiResponse::new(503, "").is_success());
    }

    #[test]
    fn test_error_message_prefers_message_then_detail() {
        let resp = ApiResponse::new(400, r#"{"message":"Email taken","detail":"x"}"#);
        assert_eq!(resp.error_message().as_deref(), Some("Email taken"));

        let resp = ApiResponse::new(401, r#"{"detail":"Incorrect username or password"}"#);
        assert_eq!(
            resp.error_message().as_deref(),
            Some("Incorrect username or password")
        );
    }

    #[test]
    fn test_error_message_ignores_non_json_and_non_string() {
        assert!(ApiResponse::new(500, "<html>oops</html>")
            .error_message()
            .is_none());
        // FastAPI validation errors put a list in `detail`
        assert!(ApiResponse::new(422, r#"{"detail":[{"loc":["body"]}]}"#)
            .error_message()
            .is_none());
    }

    #[test]
    fn test_post_serialises_body() {
        #[derive(Serialize)]
        struct Body {
            email: &'static str,
        }

        let req = ApiRequest::post("/auth/forgot-password", &Body { email: "a@b.c" }).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body.unwrap()["email"], "a@b.c");
        assert!(req.bearer.is_none());
    }
}
