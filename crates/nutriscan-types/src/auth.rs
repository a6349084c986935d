//! Authentication wire types and the normalised `AuthResult` envelope.

use serde::{Deserialize, Serialize};

// ============================================================================
// USER
// ============================================================================

/// Identity of the signed-in user.
///
/// The backend is inconsistent about field names (`uuid` vs `id`,
/// `displayName` vs `display_name`), so both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "uuid")]
    pub id: String,
    pub email: String,
    #[serde(rename = "displayName", alias = "display_name")]
    pub display_name: String,
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Body of `POST /auth/forgot-password`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body of `POST /auth/reset-password`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

// ============================================================================
// RESPONSES
// ============================================================================

/// Raw response body shared by every `/auth/*` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Uniform success/failure envelope returned by every auth gateway call.
///
/// When `success` is false, `message` is always populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub success: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    pub message: Option<String>,
}

impl AuthResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            token: None,
            message: Some(message.into()),
        }
    }

    /// Normalise a decoded backend body, filling in `fallback` when the
    /// backend reports failure without saying why.
    pub fn from_response(response: AuthResponse, fallback: &str) -> Self {
        if !response.success {
            return Self::failure(
                response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            );
        }

        Self {
            success: true,
            user: response.user,
            token: response.token,
            message: response.message,
        }
    }

    /// The failure text, if this is a failure
    pub fn error_message(&self) -> Option<&str> {
        if self.success {
            None
        } else {
            self.message.as_deref()
        }
    }
}
