//! Provider connection settings
//!
//! Settings live in `~/.config/buddy/config.yaml` and can be overridden by
//! `BUDDY_URL`, `BUDDY_TOKEN` and `BUDDY_VERIFY_SSL`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{CoreError, Result};

pub const ENV_BUDDY_URL: &str = "BUDDY_URL";
pub const ENV_BUDDY_TOKEN: &str = "BUDDY_TOKEN";
pub const ENV_BUDDY_VERIFY_SSL: &str = "BUDDY_VERIFY_SSL";

/// Connection settings for a Buddy workspace API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Workspace API URL, e.g. `https://api.buddy.works/workspaces/acme`
    #[serde(default)]
    pub buddy_url: String,

    /// Personal access token
    #[serde(default)]
    pub token: String,

    /// Verify the server certificate
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_verify_ssl() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            buddy_url: String::new(),
            token: String::new(),
            verify_ssl: default_verify_ssl(),
        }
    }
}

impl ProviderConfig {
    pub fn new(buddy_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            buddy_url: buddy_url.into(),
            token: token.into(),
            verify_ssl: true,
        }
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific path
    ///
    /// The file holds the token, so it is created `0600` on Unix.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut options = std::fs::OpenOptions::new();
            options.write(true).create(true).truncate(true).mode(0o600);
            std::io::Write::write_all(&mut options.open(path)?, content.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(path, content)?;
        }

        Ok(())
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| CoreError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("buddy").join("config.yaml"))
    }

    /// Apply `BUDDY_*` environment variables on top of this configuration
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BUDDY_URL).filter(|v| !v.is_empty()) {
            self.buddy_url = url;
        }
        if let Some(token) = lookup(ENV_BUDDY_TOKEN).filter(|v| !v.is_empty()) {
            self.token = token;
        }
        if let Some(verify) = lookup(ENV_BUDDY_VERIFY_SSL).filter(|v| !v.is_empty()) {
            self.verify_ssl = parse_bool(ENV_BUDDY_VERIFY_SSL, &verify)?;
        }
        Ok(self)
    }

    /// Check that the settings are usable for building a client
    pub fn validate(&self) -> Result<()> {
        if self.buddy_url.is_empty() {
            return Err(CoreError::MissingField {
                field: "buddy_url".to_string(),
            });
        }
        if self.token.is_empty() {
            return Err(CoreError::MissingField {
                field: "token".to_string(),
            });
        }

        let parsed = Url::parse(&self.buddy_url).map_err(|e| CoreError::InvalidUrl {
            url: self.buddy_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CoreError::InvalidUrl {
                url: self.buddy_url.clone(),
                reason: "URL must start with http:// or https://".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(CoreError::InvalidConfig {
            message: format!("{} must be a boolean, got '{}'", name, value),
        }),
    }
}
