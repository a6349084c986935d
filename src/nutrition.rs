//! Nutrition gateway - label analysis and daily logs
//!
//! Same folding rules as the auth gateway: every outcome is a
//! [`NutritionResult`], failures always carry a message.

use std::sync::Arc;

use chrono::NaiveDate;
use nutriscan_client::{ApiRequest, ApiResponse, BackendTransport};
use nutriscan_types::{AnalyzeLabelRequest, NutritionResult};
use serde_json::Value;

use crate::credential::CredentialStore;
use crate::exchange::exchange;

pub const ANALYZE_FAILED: &str = "Failed to analyze label";
pub const DAILY_LOGS_FAILED: &str = "Failed to fetch daily logs";

#[derive(Clone)]
pub struct NutritionGateway {
    transport: Arc<dyn BackendTransport>,
    credentials: Arc<dyn CredentialStore>,
}

impl NutritionGateway {
    pub fn new(transport: Arc<dyn BackendTransport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub async fn analyze_label(&self, request: &AnalyzeLabelRequest) -> NutritionResult {
        let request = ApiRequest::post("/nutrition/analyze", request)
            .map(|r| r.with_bearer(self.bearer()));
        self.call(request, ANALYZE_FAILED).await
    }

    pub async fn get_daily_logs(&self, date: NaiveDate) -> NutritionResult {
        let path = format!("/nutrition/logs/{}", date.format("%Y-%m-%d"));
        let request = ApiRequest::get(path).with_bearer(self.bearer());
        self.call(Ok(request), DAILY_LOGS_FAILED).await
    }

    fn bearer(&self) -> Option<String> {
        self.credentials.current().map(|c| c.value)
    }

    async fn call(
        &self,
        request: nutriscan_client::Result<ApiRequest>,
        fallback: &str,
    ) -> NutritionResult {
        match exchange(&self.transport, request, fallback).await {
            Ok(response) => normalise(&response, fallback),
            Err(message) => NutritionResult::failure(message),
        }
    }
}

/// Fold a 2xx body into a result.
///
/// An empty body is a success without data. A body with `success: false` is
/// a failure. Otherwise `data` is the body's `data` field, or the whole body
/// when there is none.
fn normalise(response: &ApiResponse, fallback: &str) -> NutritionResult {
    if response.body.trim().is_empty() {
        return NutritionResult::ok(None);
    }

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Malformed nutrition response: {}", e);
            return NutritionResult::failure(fallback);
        }
    };

    if body.get("success").and_then(Value::as_bool) == Some(false) {
        return NutritionResult::failure(
            response.error_message().unwrap_or_else(|| fallback.to_string()),
        );
    }

    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            NutritionResult::ok(map.remove("data").filter(|d| !d.is_null()))
        }
        other => NutritionResult::ok(Some(other)),
    }
}
