//! Durable credential storage
//!
//! The web client kept the auth token in an `auth_token` cookie with a
//! 7-day expiry. Here the cookie jar is a [`CredentialStore`]: in memory for
//! tests and embedded use, or a small JSON file for the CLI.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CredentialError;

pub const AUTH_COOKIE: &str = "auth_token";
pub const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// A named token with an absolute expiry
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub name: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Expiry is `now + ttl`; a ttl past the representable range is an error
    pub fn issue(
        name: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, CredentialError> {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or(CredentialError::ExpiryOutOfRange {
                ttl_secs: ttl.num_seconds(),
            })?;
        Ok(Self {
            name: name.into(),
            value: value.into(),
            expires_at,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Cookie-jar equivalent holding at most one credential
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, CredentialError>;

    fn save(&self, credential: &Credential) -> Result<(), CredentialError>;

    fn clear(&self) -> Result<(), CredentialError>;

    /// The stored credential if it is still valid.
    ///
    /// Expired credentials are removed; storage errors are logged and read
    /// as "no credential".
    fn current(&self) -> Option<Credential> {
        match self.load() {
            Ok(Some(credential)) if credential.is_expired() => {
                tracing::info!("Stored {} expired at {}", credential.name, credential.expires_at);
                if let Err(e) = self.clear() {
                    tracing::warn!("Failed to remove expired credential: {}", e);
                }
                None
            }
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!("Failed to read credential store: {}", e);
                None
            }
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Credential>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialError> {
        Ok(self.slot().clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        *self.slot() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.slot() = None;
        Ok(())
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// Stores the credential as JSON at a fixed path
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(credential)?;
        fs::write(&self.path, content)?;
        tracing::debug!("Saved {} to {}", credential.name, self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
