//! Application configuration.
//!
//! Stored as TOML at `~/.config/bikeshare/config.toml` (or the XDG
//! equivalent). Every field is optional; a missing file means defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! data_dir = "/srv/bikeshare"
//!
//! [files]
//! new_york = "nyc_2017_h1.csv"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{City, DatasetCatalog};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Per-city data file names, relative to `data_dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileOverrides {
    #[serde(default)]
    pub chicago: Option<String>,
    #[serde(default)]
    pub new_york: Option<String>,
    #[serde(default)]
    pub washington: Option<String>,
}

impl FileOverrides {
    fn get(&self, city: City) -> Option<&str> {
        match city {
            City::Chicago => self.chicago.as_deref(),
            City::NewYork => self.new_york.as_deref(),
            City::Washington => self.washington.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the city CSV files. Defaults to the working directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub files: FileOverrides,
}

impl AppConfig {
    /// Load from the default location, or defaults if there is no file.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Default config file path.
    ///
    /// - Primary: `$XDG_CONFIG_HOME/bikeshare/config.toml`
    /// - Fallback: platform config dir (`~/.config/bikeshare/config.toml` on Linux)
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join("bikeshare").join("config.toml"));
        }

        dirs::config_dir().map(|p| p.join("bikeshare").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for city in City::ALL {
            let Some(name) = self.files.get(city) else {
                continue;
            };
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "file name for {} cannot be empty",
                    city.slug()
                )));
            }
            // A bare file name inside data_dir; no absolute paths, no escapes.
            if name.contains('/') || name.contains('\\') {
                return Err(ConfigError::Validation(format!(
                    "file name for {} cannot contain path separators",
                    city.slug()
                )));
            }
            if name == "." || name == ".." {
                return Err(ConfigError::Validation(format!(
                    "file name for {} must name a file",
                    city.slug()
                )));
            }
        }
        Ok(())
    }

    /// Build the catalog. `data_dir_override` (flag or environment) wins over
    /// the configured directory.
    pub fn catalog(&self, data_dir_override: Option<&Path>) -> DatasetCatalog {
        let data_dir = data_dir_override
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        City::ALL
            .iter()
            .fold(DatasetCatalog::new(data_dir), |catalog, city| {
                match self.files.get(*city) {
                    Some(name) => catalog.with_file(*city, name),
                    None => catalog,
                }
            })
    }
}
