//! Config loading and path resolution methods for `Config`.

use std::fs;
use std::path::{Path, PathBuf};

use super::config_struct::Config;
use crate::error::ConfigError;

impl Config {
    /// Load the configuration from `path`, or defaults if the file does not exist.
    ///
    /// The result is validated before it is returned.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Config path: {:?}", path);

        let config = if path.exists() {
            log::info!("Loading existing config from {:?}", path);
            let contents = fs::read_to_string(path)?;
            Self::from_yaml(&contents)?
        } else {
            log::info!("Config file not found at {:?}, using built-in defaults", path);
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse YAML text. An empty document yields the defaults.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// `$XDG_CONFIG_HOME/rootclock`, falling back to `~/.config/rootclock`
    pub fn config_dir() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("rootclock")
        } else if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".config").join("rootclock")
        } else {
            PathBuf::from("rootclock")
        }
    }
}
