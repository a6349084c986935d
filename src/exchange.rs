//! One backend round trip, folded to "2xx response" or "failure text"
//!
//! Both gateways go through here so transport errors, non-2xx statuses and
//! unencodable requests all collapse the same way. Nothing is retried.

use std::sync::Arc;

use nutriscan_client::{ApiRequest, ApiResponse, BackendTransport, TransportError};

pub(crate) async fn exchange(
    transport: &Arc<dyn BackendTransport>,
    request: Result<ApiRequest, TransportError>,
    fallback: &str,
) -> Result<ApiResponse, String> {
    let request = request.map_err(|e| {
        tracing::warn!("Could not build request: {}", e);
        fallback.to_string()
    })?;
    let label = format!("{} {}", request.method, request.path);

    match transport.send(request).await {
        Ok(response) if response.is_success() => Ok(response),
        Ok(response) => {
            tracing::warn!("{} -> HTTP {}", label, response.status);
            Err(response
                .error_message()
                .unwrap_or_else(|| fallback.to_string()))
        }
        Err(e) => {
            tracing::warn!("{} failed: {}", label, e);
            Err(fallback.to_string())
        }
    }
}
