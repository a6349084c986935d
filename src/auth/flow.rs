//! Auth flow - commits gateway results to the session and the cookie jar
//!
//! Sequence for login/register:
//!
//! ```text
//! begin_auth() ─► gateway call ─► success + user ─► save auth_token (7d) ─► complete_auth(user)
//!                               └► anything else  ─► fail_auth(message)
//! ```
//!
//! Two overlapping logins are last-write-wins: each settlement applies to
//! whatever the session is at that moment.

use std::sync::Arc;

use chrono::Duration;
use nutriscan_types::AuthResult;

use super::gateway::{AuthGateway, LOGIN_FAILED, REGISTRATION_FAILED};
use crate::credential::{Credential, CredentialStore, AUTH_COOKIE, DEFAULT_EXPIRY_DAYS};
use crate::notify::Notifier;
use crate::session::SessionStore;

pub const WELCOME_BACK: &str = "Welcome back!";
pub const WELCOME_NEW: &str = "Welcome to NutriScan!";
pub const SIGNED_OUT: &str = "Signed out";

/// How issued tokens are persisted
#[derive(Debug, Clone)]
pub struct CredentialPolicy {
    pub cookie_name: String,
    pub ttl: Duration,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            cookie_name: AUTH_COOKIE.to_string(),
            ttl: Duration::days(DEFAULT_EXPIRY_DAYS),
        }
    }
}

#[derive(Clone)]
pub struct AuthFlow {
    gateway: AuthGateway,
    session: SessionStore,
    credentials: Arc<dyn CredentialStore>,
    notifier: Notifier,
    policy: CredentialPolicy,
}

impl AuthFlow {
    pub fn new(
        gateway: AuthGateway,
        session: SessionStore,
        credentials: Arc<dyn CredentialStore>,
        notifier: Notifier,
        policy: CredentialPolicy,
    ) -> Self {
        Self {
            gateway,
            session,
            credentials,
            notifier,
            policy,
        }
    }

    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult {
        self.session.begin_auth();
        let result = self.gateway.login(email, password).await;
        self.settle(result, LOGIN_FAILED, WELCOME_BACK)
    }

    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> AuthResult {
        self.session.begin_auth();
        let result = self.gateway.register(email, password, display_name).await;
        self.settle(result, REGISTRATION_FAILED, WELCOME_NEW)
    }

    pub fn logout(&self) {
        self.session.logout();
        self.notifier.info(SIGNED_OUT);
    }

    /// Re-attach the user behind a stored credential, if any.
    ///
    /// Expired credentials are dropped without a network call. A credential
    /// the backend rejects is removed. Returns whether a user was attached.
    pub async fn restore(&self) -> bool {
        let Some(credential) = self.credentials.current() else {
            return false;
        };

        let result = self.gateway.validate_token(&credential.value).await;
        match result.user {
            Some(user) if result.success => {
                tracing::info!("Restored session for {}", user.id);
                self.session.set_user(Some(user));
                true
            }
            _ => {
                tracing::info!(
                    "Stored credential rejected: {}",
                    result.message.as_deref().unwrap_or("no user returned")
                );
                if let Err(e) = self.credentials.clear() {
                    tracing::warn!("Failed to clear rejected credential: {}", e);
                }
                false
            }
        }
    }

    fn settle(&self, result: AuthResult, fallback: &str, welcome: &str) -> AuthResult {
        let user = match (&result.user, result.success) {
            (Some(user), true) => user.clone(),
            (None, true) => {
                tracing::warn!("Backend reported success without a user");
                let result = AuthResult::failure(fallback);
                self.reject(fallback);
                return result;
            }
            _ => {
                let message = result.error_message().unwrap_or(fallback).to_string();
                self.reject(&message);
                return result;
            }
        };

        match &result.token {
            Some(token) => {
                let saved = Credential::issue(&self.policy.cookie_name, token, self.policy.ttl)
                    .and_then(|credential| self.credentials.save(&credential));
                if let Err(e) = saved {
                    tracing::warn!("Failed to persist {}: {}", self.policy.cookie_name, e);
                }
            }
            None => tracing::warn!("Backend issued no token, session will not survive restart"),
        }

        self.session.complete_auth(user);
        self.notifier.success(welcome);
        result
    }

    fn reject(&self, message: &str) {
        self.session.fail_auth(message);
        self.notifier.error(message);
    }
}
