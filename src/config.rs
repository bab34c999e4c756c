use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kernel::capabilities::Capabilities;
use crate::kernel::loader::DEFAULT_BINARY_SUFFIXES;

const ENV_PREFIX: &str = "MODEL_HOST_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub app_name: String,
    /// Telemetry app name until page metadata supplies a `type`.
    pub app_type: String,
    /// Telemetry app version until page metadata supplies a `version`.
    pub app_version: String,
    /// Page location; relative locators resolve against it.
    pub location: Option<String>,
    pub binary_suffixes: Vec<String>,
    pub capabilities: Capabilities,
    pub user_agent: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            app_name: "model-host".to_string(),
            app_type: "Browser".to_string(),
            app_version: "0.0.0".to_string(),
            location: None,
            binary_suffixes: DEFAULT_BINARY_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            capabilities: Capabilities::default(),
            user_agent: concat!("model-host/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HostConfig {
    /// Defaults, overlaid by the JSON file if given, then by `MODEL_HOST_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(location) = var("LOCATION") {
            self.location = Some(location);
        }
        if let Some(version) = var("APP_VERSION") {
            self.app_version = version;
        }
        if let Some(suffixes) = var("BINARY_SUFFIXES") {
            self.binary_suffixes = suffixes
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(value) = var("ANALYTICS") {
            self.capabilities.analytics = parse_flag("ANALYTICS", &value)?;
        }
        if let Some(value) = var("NATIVE_DECODER") {
            self.capabilities.native_text_decoder = parse_flag("NATIVE_DECODER", &value)?;
        }
        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: format!("{}{}", ENV_PREFIX, name),
            value: value.to_string(),
        }),
    }
}
