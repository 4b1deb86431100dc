//! Settings for the terminal host.
//!
//! Precedence, lowest first: built-in defaults, `gateway-admin.toml`,
//! environment variables, command-line flags (applied by `main`).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "gateway-admin.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub admin_url: String,
    pub log_filter: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            admin_url: "http://127.0.0.1:8001".into(),
            log_filter: "info".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

impl Settings {
    /// Load settings from `path` (or `gateway-admin.toml` in the working
    /// directory when `None`) and the process environment.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };

        let mut settings = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => Settings::default(),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Override fields from environment-style lookups. `APP__*` names win
    /// over the plain ones.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = lookup("GATEWAY_ADMIN_URL") {
            self.admin_url = v;
        }
        if let Some(v) = lookup("APP__ADMIN_URL") {
            self.admin_url = v;
        }

        if let Some(v) = lookup("APP__LOG_FILTER") {
            self.log_filter = v;
        }

        if let Some(v) = lookup("APP__TIMEOUT_SECS") {
            self.timeout_secs = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "APP__TIMEOUT_SECS",
                value: v,
            })?;
        }

        Ok(())
    }
}
