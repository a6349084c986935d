//! Application context
//!
//! Builds every component from a [`ClientConfig`] and shares the session,
//! credential store and notifier between them.

use std::sync::Arc;

use nutriscan_client::{AssetHost, BackendTransport, CloudinaryHost, HttpTransport};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::auth::{AuthFlow, AuthGateway, CredentialPolicy, PasswordRecovery};
use crate::config::ClientConfig;
use crate::credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use crate::error::NutriError;
use crate::notify::{Notice, Notifier};
use crate::nutrition::NutritionGateway;
use crate::route_guard::{RouteDecision, RoutePolicy};
use crate::scan::{ProgressMessages, ScanCoordinator};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct NutriScanApp {
    config: ClientConfig,
    credentials: Arc<dyn CredentialStore>,
    session: SessionStore,
    notifier: Notifier,
    auth: AuthFlow,
    nutrition: NutritionGateway,
    scan: ScanCoordinator,
}

impl NutriScanApp {
    /// Wire the real reqwest transport, Cloudinary host and configured
    /// credential store
    pub fn from_config(
        config: ClientConfig,
    ) -> Result<(Self, UnboundedReceiver<Notice>), NutriError> {
        config.validate()?;

        let transport: Arc<dyn BackendTransport> = Arc::new(HttpTransport::new(
            &config.api.base_url,
            config.request_timeout(),
        )?);
        let assets: Arc<dyn AssetHost> = Arc::new(CloudinaryHost::new(
            &config.asset_host.upload_base,
            &config.asset_host.cloud_name,
            &config.asset_host.upload_preset,
            config.request_timeout(),
        )?);
        let credentials: Arc<dyn CredentialStore> = match &config.credential.path {
            Some(path) => Arc::new(FileCredentialStore::new(path.clone())),
            None => Arc::new(MemoryCredentialStore::new()),
        };

        tracing::info!("NutriScan client targeting {}", config.api.base_url);
        if config.asset_host.cloud_name.is_empty() {
            tracing::warn!("No image host cloud name configured, scans will fail to upload");
        }

        Ok(Self::with_parts(config, transport, assets, credentials))
    }

    /// Wire from explicit collaborators
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn BackendTransport>,
        assets: Arc<dyn AssetHost>,
        credentials: Arc<dyn CredentialStore>,
    ) -> (Self, UnboundedReceiver<Notice>) {
        let (notifier, notices) = Notifier::channel();
        let session = SessionStore::new(credentials.clone());

        let auth = AuthFlow::new(
            AuthGateway::new(transport.clone()),
            session.clone(),
            credentials.clone(),
            notifier.clone(),
            CredentialPolicy {
                cookie_name: config.credential.cookie_name.clone(),
                ttl: config.credential_ttl(),
            },
        );
        let nutrition = NutritionGateway::new(transport, credentials.clone());
        let progress =
            ProgressMessages::new(config.progress.messages.clone(), config.progress_interval());
        let scan = ScanCoordinator::new(
            session.clone(),
            assets,
            nutrition.clone(),
            notifier.clone(),
            progress,
        );

        let app = Self {
            config,
            credentials,
            session,
            notifier,
            auth,
            nutrition,
            scan,
        };
        (app, notices)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn auth(&self) -> &AuthFlow {
        &self.auth
    }

    pub fn nutrition(&self) -> &NutritionGateway {
        &self.nutrition
    }

    pub fn scan(&self) -> &ScanCoordinator {
        &self.scan
    }

    pub fn routes(&self) -> &RoutePolicy {
        &self.config.routes
    }

    /// A fresh forgot-password page
    pub fn password_recovery(&self) -> PasswordRecovery {
        PasswordRecovery::new(self.auth.gateway().clone(), self.notifier.clone())
    }

    /// Route decision using the stored credential
    pub fn check_route(&self, path: &str) -> RouteDecision {
        let has_credential = self.credentials.current().is_some();
        self.config.routes.decide(path, has_credential)
    }
}
