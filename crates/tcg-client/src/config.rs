//! Client configuration
//!
//! Resolution order, later wins:
//! 1. [`ClientConfig::default`]
//! 2. an optional TOML file
//! 3. `TCG_BASE_URL`, `TCG_API_PREFIX`, `TCG_TIMEOUT_SECS`, `TCG_EXPORT_DIR`
//! 4. explicit `with_*` calls (the CLI flags)

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default API mount point
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Backend address and export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend
    pub base_url: String,
    /// Path prefix every endpoint lives under
    pub api_prefix: String,
    /// Per-request timeout; `None` leaves it to the network stack
    pub timeout_secs: Option<u64>,
    /// Directory exports are written to
    pub export_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout_secs: None,
            export_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Create config with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set API prefix
    #[inline]
    #[must_use]
    pub fn with_api_prefix(mut self, api_prefix: impl Into<String>) -> Self {
        self.api_prefix = api_prefix.into();
        self
    }

    /// Set request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set export directory
    #[inline]
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Request timeout as a duration
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// `base_url` + `api_prefix`, without a trailing slash
    #[must_use]
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{prefix}")
        }
    }

    /// Parse a TOML document; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] for malformed documents.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from a variable lookup
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] if `TCG_TIMEOUT_SECS` is not a number.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = set("TCG_BASE_URL") {
            self.base_url = url;
        }
        if let Some(prefix) = set("TCG_API_PREFIX") {
            self.api_prefix = prefix;
        }
        if let Some(raw) = set("TCG_TIMEOUT_SECS") {
            let secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "TCG_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            self.timeout_secs = Some(secs);
        }
        if let Some(dir) = set("TCG_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
        Ok(self)
    }

    /// Defaults, then `path` if given, then the process environment
    ///
    /// # Errors
    /// Returns an error if the file or an environment value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_root(), "http://127.0.0.1:8000/api/v1");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn api_root_normalises_slashes() {
        let config = ClientConfig::new()
            .with_base_url("http://backend:9000/")
            .with_api_prefix("api/v2/");
        assert_eq!(config.api_root(), "http://backend:9000/api/v2");
        assert_eq!(config.with_api_prefix("").api_root(), "http://backend:9000");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str("base_url = \"http://qa:8000\"\ntimeout_secs = 30\n").unwrap();
        assert_eq!(config.base_url, "http://qa:8000");
        assert_eq!(config.api_prefix, DEFAULT_API_PREFIX);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(matches!(
            ClientConfig::from_toml_str("base_url = "),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn env_overrides_file() {
        let env: HashMap<&str, &str> = [("TCG_BASE_URL", "http://prod:8000"), ("TCG_EXPORT_DIR", "/tmp/out"), ("TCG_API_PREFIX", " ")]
            .into_iter()
            .collect();
        let config = ClientConfig::new()
            .apply_env(|k| env.get(k).map(|v| (*v).to_string()))
            .unwrap();
        assert_eq!(config.base_url, "http://prod:8000");
        assert_eq!(config.api_prefix, DEFAULT_API_PREFIX);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn bad_timeout_rejected() {
        let err = ClientConfig::new()
            .apply_env(|k| (k == "TCG_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("TCG_TIMEOUT_SECS"));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tcg.toml");
        std::fs::write(&path, "api_prefix = \"/v9\"\nexport_dir = \"reports\"\n").unwrap();
        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.api_root(), "http://127.0.0.1:8000/v9");
        assert_eq!(config.export_dir, PathBuf::from("reports"));
    }
}
