//! NutriScan - client core for the nutrition-tracking app
//!
//! The two pieces with real state live here: the authentication/session
//! state machine and the food-label scan coordinator. Everything crossing
//! the wire is defined in `nutriscan-types`; the HTTP and image-host
//! plumbing is in `nutriscan-client`.
//!
//! ## Flow
//!
//! ```text
//! UI action ─► AuthGateway ─► AuthResult ─► SessionStore transition ─► watchers
//! select image ─► AssetHost upload ─► URL ─► /nutrition/analyze ─► notice
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nutriscan::{ClientConfig, NutriScanApp};
//!
//! # async fn run() -> Result<(), nutriscan::NutriError> {
//! let (app, _notices) = NutriScanApp::from_config(ClientConfig::load()?)?;
//! let result = app.auth().login("admin@admin.com", "adminn").await;
//! assert_eq!(result.success, app.session().snapshot().is_authenticated());
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Configuration and tracing setup
pub mod config;
pub mod logging;

// Session state and durable credential
pub mod credential;
pub mod session;

// Backend gateways and the flows on top of them
pub mod auth;
mod exchange;
pub mod nutrition;

// Scan dialog
pub mod scan;

// UI-side policy
pub mod notify;
pub mod route_guard;
pub mod validation;

// Wiring
pub mod app;

pub use app::NutriScanApp;
pub use auth::{AuthFlow, AuthGateway, PasswordRecovery, RecoveryView};
pub use config::ClientConfig;
pub use credential::{Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{ConfigError, CredentialError, NutriError, ScanError};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use nutrition::NutritionGateway;
pub use route_guard::{RouteDecision, RoutePolicy};
pub use scan::{ScanCoordinator, ScanPhase, SubmitOutcome};
pub use session::{AuthPhase, Session, SessionStore};

pub use nutriscan_types::{AuthResult, ImageBlob, MealType, NutritionResult, Tag, User};
