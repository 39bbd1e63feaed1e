use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::{debug, info, warn};

use crate::domain::{Parameter, ParameterConfig};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "SliceCost";
const APP_NAME: &str = "SliceCost";
const CONFIG_FILE: &str = "parameters.json";

fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Location of the persisted parameter configuration.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: Option<PathBuf>,
}

impl ConfigStore {
    /// Store in the platform config directory, if one can be determined.
    pub fn default_location() -> Self {
        Self {
            path: default_config_file(),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load_config(&self) -> Result<ParameterConfig, ConfigLoadError> {
        let path = self.path().ok_or(ConfigLoadError::StorageUnavailable)?;
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigLoadError::NotFound(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };

        let config: ParameterConfig = serde_json::from_str(&data)?;
        if let Some(parameter) = config.first_invalid_value() {
            return Err(ConfigLoadError::InvalidValue { parameter });
        }
        Ok(config)
    }

    /// Loads the stored config, falling back to the defaults when it is
    /// missing or unusable.
    pub fn load_or_default(&self) -> ParameterConfig {
        match self.load_config() {
            Ok(config) => {
                debug!(path = ?self.path, "loaded parameter config");
                config
            }
            Err(ConfigLoadError::NotFound(path)) => {
                debug!(path = %path.display(), "no stored parameter config, using defaults");
                ParameterConfig::default()
            }
            Err(err) => {
                warn!("failed to load stored parameter config, using defaults: {err}");
                ParameterConfig::default()
            }
        }
    }

    pub fn save_config(&self, config: &ParameterConfig) -> Result<(), ConfigSaveError> {
        let path = self.path().ok_or(ConfigSaveError::StorageUnavailable)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "saved parameter config");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error("no stored config at {}", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] SerdeError),
    #[error("stored value for {parameter} is negative or not a number")]
    InvalidValue { parameter: Parameter },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
