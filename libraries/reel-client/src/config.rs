//! Client configuration

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "reel.toml";

/// Connection settings for the generation service
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Whole-request timeout; generation runs the model synchronously and
    /// the service gives a render up to 900 s, so this stays above that
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with everything else defaulted
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load configuration from `reel.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from `path` (if present) and environment
    ///
    /// Environment variables are prefixed with `REEL_`, e.g.
    /// `REEL_BASE_URL` or `REEL_TIMEOUT_SECS`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("REEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.service_url()?;

        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(ClientError::Config(
                "Timeouts must be at least one second".to_string(),
            ));
        }

        Ok(())
    }

    /// Base URL with the trailing slash trimmed
    ///
    /// Only http and https are accepted.
    pub fn service_url(&self) -> Result<String> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        Url::parse(trimmed)?;
        Ok(trimmed.to_string())
    }

    /// API prefix normalized to `/segment` form (empty for none)
    pub fn api_path(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

// Default values

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    960
}

fn default_connect_timeout_secs() -> u64 {
    10
}
