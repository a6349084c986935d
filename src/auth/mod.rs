//! Authentication: gateway, session commit flow, password recovery

pub mod flow;
pub mod gateway;
pub mod recovery;

pub use flow::{AuthFlow, CredentialPolicy};
pub use gateway::AuthGateway;
pub use recovery::{PasswordRecovery, RecoveryView};
