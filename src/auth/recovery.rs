//! Password recovery
//!
//! The forgot-password page is a two-view state machine: the form, and a
//! "check your email" view that offers a retry back to the form.

use nutriscan_types::AuthResult;

use super::gateway::AuthGateway;
use crate::notify::Notifier;

pub const RESET_SENT: &str = "Password reset instructions sent to your email";
pub const RESET_SEND_FAILED: &str = "Failed to send reset instructions. Please try again.";
pub const PASSWORD_RESET: &str = "Your password has been reset";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryView {
    #[default]
    Form,
    Submitted,
}

pub struct PasswordRecovery {
    gateway: AuthGateway,
    notifier: Notifier,
    view: RecoveryView,
    loading: bool,
}

impl PasswordRecovery {
    pub fn new(gateway: AuthGateway, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            view: RecoveryView::Form,
            loading: false,
        }
    }

    pub fn view(&self) -> RecoveryView {
        self.view
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Request reset instructions. Only a backend success moves to `Submitted`.
    pub async fn submit(&mut self, email: &str) -> AuthResult {
        self.loading = true;
        let result = self.gateway.forgot_password(email).await;
        self.loading = false;

        if result.success {
            self.view = RecoveryView::Submitted;
            self.notifier.success(RESET_SENT);
        } else {
            tracing::info!(
                "forgot-password failed: {}",
                result.error_message().unwrap_or_default()
            );
            self.notifier.error(RESET_SEND_FAILED);
        }
        result
    }

    /// "Didn't receive the email? Try again"
    pub fn retry(&mut self) {
        self.view = RecoveryView::Form;
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> AuthResult {
        let result = self.gateway.reset_password(token, password).await;
        match result.error_message() {
            None => self.notifier.success(PASSWORD_RESET),
            Some(message) => self.notifier.error(message),
        }
        result
    }
}
