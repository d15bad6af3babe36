use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

pub const ENV_ACCESS_KEY: &str = "SHARDREG_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "SHARDREG_SECRET_KEY";
pub const ENV_SECURE: &str = "SHARDREG_SECURE";

/// Credentials and transport options shared by every storage client the
/// registry builds.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub access_key: String,
    pub secret_key: String,
    #[serde(default = "default_secure")]
    pub secure: bool,
    #[serde(default = "default_region")]
    pub region: String,
    /// Cadence for [`spawn_periodic_reload`](crate::spawn_periodic_reload), if the
    /// owning process wants one.
    #[serde(default)]
    pub reload_interval_secs: Option<u64>,
}

fn default_secure() -> bool {
    true
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl ClientConfig {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>, secure: bool) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            secure,
            region: default_region(),
            reload_interval_secs: None,
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Applies `SHARDREG_*` environment variables on top of this config.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(access_key) = lookup(ENV_ACCESS_KEY) {
            self.access_key = access_key;
        }
        if let Some(secret_key) = lookup(ENV_SECRET_KEY) {
            self.secret_key = secret_key;
        }
        if let Some(secure) = lookup(ENV_SECURE) {
            self.secure = parse_bool(&secure)
                .ok_or_else(|| Error::Config(format!("{ENV_SECURE} is not a boolean: {secure:?}")))?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_key.trim().is_empty() {
            return Err(Error::Config("access_key must not be empty".into()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(Error::Config("secret_key must not be empty".into()));
        }
        if self.reload_interval_secs == Some(0) {
            return Err(Error::Config("reload_interval_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn reload_interval(&self) -> Option<Duration> {
        self.reload_interval_secs.map(Duration::from_secs)
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("secure", &self.secure)
            .field("region", &self.region)
            .field("reload_interval_secs", &self.reload_interval_secs)
            .finish()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
