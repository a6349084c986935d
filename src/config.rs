//! Client configuration
//!
//! Loaded from an optional YAML file and then overridden by environment
//! variables (a `.env` file is honoured). Every field has a default, so an
//! empty file, or no file at all, is a valid configuration.
//!
//! ```yaml
//! api:
//!   base_url: http://localhost:8000
//!   timeout_secs: 30
//! asset_host:
//!   cloud_name: demo
//!   upload_preset: nutriscan
//! credential:
//!   expiry_days: 7
//!   path: ~/.nutriscan/credential.json
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::credential::{AUTH_COOKIE, DEFAULT_EXPIRY_DAYS};
use crate::error::ConfigError;
use crate::route_guard::RoutePolicy;
use crate::scan::progress::{default_messages, DEFAULT_INTERVAL};

pub const ENV_CONFIG_PATH: &str = "NUTRISCAN_CONFIG";
pub const ENV_API_URL: &str = "NUTRISCAN_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "NUTRISCAN_TIMEOUT_SECS";
pub const ENV_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
pub const ENV_UPLOAD_PRESET: &str = "CLOUDINARY_UPLOAD_PRESET";
pub const ENV_CREDENTIAL_PATH: &str = "NUTRISCAN_CREDENTIAL_PATH";

/// Upper bound for `credential.expiry_days` (ten years)
pub const MAX_EXPIRY_DAYS: i64 = 3650;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub asset_host: AssetHostConfig,
    pub credential: CredentialConfig,
    pub progress: ProgressConfig,
    pub routes: RoutePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetHostConfig {
    pub upload_base: String,
    pub cloud_name: String,
    pub upload_preset: String,
}

impl Default for AssetHostConfig {
    fn default() -> Self {
        Self {
            upload_base: nutriscan_client::CloudinaryHost::DEFAULT_UPLOAD_BASE.to_string(),
            cloud_name: String::new(),
            upload_preset: "nutriscan".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    pub cookie_name: String,
    pub expiry_days: i64,
    /// File-backed store when set, in-memory otherwise
    pub path: Option<PathBuf>,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            cookie_name: AUTH_COOKIE.to_string(),
            expiry_days: DEFAULT_EXPIRY_DAYS,
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub interval_ms: u64,
    pub messages: Vec<String>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL.as_millis() as u64,
            messages: default_messages(),
        }
    }
}

impl ClientConfig {
    /// `.env`, then `$NUTRISCAN_CONFIG` if set, then environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment-style overrides; `lookup` returns a variable's value
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.api.timeout_secs =
                secs.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: ENV_TIMEOUT_SECS.to_string(),
                        reason: e.to_string(),
                    })?;
        }
        if let Some(cloud) = lookup(ENV_CLOUD_NAME) {
            self.asset_host.cloud_name = cloud;
        }
        if let Some(preset) = lookup(ENV_UPLOAD_PRESET) {
            self.asset_host.upload_preset = preset;
        }
        if let Some(path) = lookup(ENV_CREDENTIAL_PATH) {
            self.credential.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("api.base_url", &self.api.base_url)?;
        check_url("asset_host.upload_base", &self.asset_host.upload_base)?;

        if self.api.timeout_secs == 0 {
            return Err(invalid("api.timeout_secs", "must be greater than zero"));
        }
        if self.credential.expiry_days <= 0 {
            return Err(invalid("credential.expiry_days", "must be positive"));
        }
        if self.credential.expiry_days > MAX_EXPIRY_DAYS {
            return Err(invalid(
                "credential.expiry_days",
                &format!("must be at most {}", MAX_EXPIRY_DAYS),
            ));
        }
        if self.credential.cookie_name.trim().is_empty() {
            return Err(invalid("credential.cookie_name", "must not be empty"));
        }
        if self.asset_host.upload_preset.trim().is_empty() {
            return Err(invalid("asset_host.upload_preset", "must not be empty"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Clamped to `1..=MAX_EXPIRY_DAYS` days for unvalidated configs
    pub fn credential_ttl(&self) -> chrono::Duration {
        let days = self.credential.expiry_days.clamp(1, MAX_EXPIRY_DAYS);
        chrono::Duration::try_days(days)
            .unwrap_or_else(|| chrono::Duration::days(DEFAULT_EXPIRY_DAYS))
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress.interval_ms)
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn check_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| invalid(key, &e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(key, &format!("unsupported scheme '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = ClientConfig::from_yaml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.credential.cookie_name, "auth_token");
        assert_eq!(config.credential_ttl(), chrono::Duration::days(7));
        assert_eq!(config.progress_interval(), Duration::from_secs(3));
        assert!(!config.routes.enabled);
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
api:
  base_url: https://api.nutriscan.test
asset_host:
  cloud_name: demo
routes:
  enabled: true
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://api.nutriscan.test");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.asset_host.cloud_name, "demo");
        assert_eq!(config.asset_host.upload_preset, "nutriscan");
        assert!(config.routes.enabled);
        assert_eq!(config.routes.login_path, "/login");
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = ClientConfig::from_yaml("api:\n  base_url: http://file:1\n").unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://env:2"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_CLOUD_NAME, "cloudy"),
            (ENV_CREDENTIAL_PATH, "/tmp/cred.json"),
            (ENV_UPLOAD_PRESET, ""),
        ]
        .into_iter()
        .collect();

        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.base_url, "http://env:2");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.asset_host.cloud_name, "cloudy");
        // blank values are ignored
        assert_eq!(config.asset_host.upload_preset, "nutriscan");
        assert_eq!(config.credential.path, Some(PathBuf::from("/tmp/cred.json")));
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_overrides(|k| (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_TIMEOUT_SECS));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.credential.expiry_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expiry_days_upper_bound() {
        let config = ClientConfig::from_yaml("credential:\n  expiry_days: 100000000\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "credential.expiry_days")
        );
        assert_eq!(config.credential_ttl(), chrono::Duration::days(MAX_EXPIRY_DAYS));

        let mut config = ClientConfig::default();
        config.credential.expiry_days = MAX_EXPIRY_DAYS;
        assert!(config.validate().is_ok());

        config.credential.expiry_days = i64::MAX;
        assert!(config.validate().is_err());
        assert_eq!(config.credential_ttl(), chrono::Duration::days(MAX_EXPIRY_DAYS));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  timeout_secs: 12").unwrap();
        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.timeout_secs, 12);

        let err = ClientConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ClientConfig::from_yaml("api: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
