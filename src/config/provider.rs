//! Maps Provider Config
//!
//! The provider file is optional. A missing or unreadable file, or a file
//! without a key, leaves map-based address entry disabled.

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Args;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::maps::MapsSettings;

/// Libraries requested when the provider file names none.
const DEFAULT_MAPS_LIBRARIES: &str = "places";

/// Errors raised while reading the provider file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the provider file
    #[error("Failed to read provider config: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse provider config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Provider file location.
#[derive(Debug, Args)]
pub struct ProviderConfigArgs {
    /// JSON file with `googleApiKey` and `googleMapsLibraries`
    #[arg(long, env = "PROVIDER_CONFIG")]
    pub provider_config: Option<PathBuf>,
}

impl ProviderConfigArgs {
    /// Read the provider file, best effort.
    pub fn load(&self) -> ProviderConfig {
        let Some(path) = &self.provider_config else {
            return ProviderConfig::default();
        };

        match ProviderConfig::from_path(path) {
            Ok(config) => {
                debug!(path = %path.display(), "provider config loaded");
                config
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring provider config");
                ProviderConfig::default()
            }
        }
    }
}

/// Runtime provider settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Maps provider API key
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Comma-separated provider libraries
    #[serde(default)]
    pub google_maps_libraries: Option<String>,
}

impl ProviderConfig {
    /// Parse a provider file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Maps settings, when a key is configured.
    pub fn maps_settings(&self) -> Option<MapsSettings> {
        let api_key = self.google_api_key.as_deref().map(str::trim)?;

        if api_key.is_empty() {
            return None;
        }

        let libraries = self
            .google_maps_libraries
            .as_deref()
            .unwrap_or(DEFAULT_MAPS_LIBRARIES)
            .split(',')
            .map(str::trim)
            .filter(|library| !library.is_empty())
            .map(ToString::to_string)
            .collect();

        Some(MapsSettings {
            api_key: api_key.to_string(),
            libraries,
        })
    }
}
