//! Auth Gateway
//!
//! Translates the five auth operations into backend calls and always
//! resolves to an [`AuthResult`]. Transport errors, 4xx/5xx and malformed
//! bodies all come back as `success: false` with a message; nothing is
//! raised past this boundary and nothing is retried.
//!
//! The gateway has no side effects. Committing results to the session and
//! persisting tokens is [`super::flow::AuthFlow`]'s job.

use std::sync::Arc;

use nutriscan_client::{ApiRequest, BackendTransport};
use nutriscan_types::{
    AuthResponse, AuthResult, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};

use crate::exchange::exchange;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const FORGOT_PASSWORD_FAILED: &str = "Failed to send reset instructions";
pub const RESET_PASSWORD_FAILED: &str = "Password reset failed";
pub const TOKEN_VALIDATION_FAILED: &str = "Token validation failed";

#[derive(Clone)]
pub struct AuthGateway {
    transport: Arc<dyn BackendTransport>,
}

impl AuthGateway {
    pub fn new(transport: Arc<dyn BackendTransport>) -> Self {
        Self { transport }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.call(ApiRequest::post("/auth/login", &body), LOGIN_FAILED)
            .await
    }

    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> AuthResult {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
        };
        self.call(ApiRequest::post("/auth/register", &body), REGISTRATION_FAILED)
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> AuthResult {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.call(
            ApiRequest::post("/auth/forgot-password", &body),
            FORGOT_PASSWORD_FAILED,
        )
        .await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> AuthResult {
        let body = ResetPasswordRequest {
            token: token.to_string(),
            password: password.to_string(),
        };
        self.call(
            ApiRequest::post("/auth/reset-password", &body),
            RESET_PASSWORD_FAILED,
        )
        .await
    }

    /// Check a stored credential with the backend
    pub async fn validate_token(&self, credential: &str) -> AuthResult {
        let request = ApiRequest::get("/auth/validate").with_bearer(Some(credential.to_string()));
        self.call(Ok(request), TOKEN_VALIDATION_FAILED).await
    }

    async fn call(
        &self,
        request: nutriscan_client::Result<ApiRequest>,
        fallback: &str,
    ) -> AuthResult {
        let response = match exchange(&self.transport, request, fallback).await {
            Ok(response) => response,
            Err(message) => return AuthResult::failure(message),
        };

        match response.json::<AuthResponse>() {
            Ok(body) => AuthResult::from_response(body, fallback),
            Err(e) => {
                tracing::warn!("Malformed auth response: {}", e);
                AuthResult::failure(fallback)
            }
        }
    }
}
