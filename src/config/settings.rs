use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Per-repository settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GitConfig {
    /// Program spawned for every command
    pub executable: PathBuf,
    /// Remote used when an operation is not given one
    pub default_remote: String,
    /// Branch pushed when an operation is not given one
    pub default_branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            executable: PathBuf::from("git"),
            default_remote: "origin".to_string(),
            default_branch: "master".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::DirectoryNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("gitface"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&contents)?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.validate()?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Config {
            git: GitConfig::default(),
        }
    }

    pub fn with_executable<P: Into<PathBuf>>(mut self, executable: P) -> Self {
        self.git.executable = executable.into();
        self
    }

    pub fn with_default_remote<S: Into<String>>(mut self, remote: S) -> Self {
        self.git.default_remote = remote.into();
        self
    }

    pub fn with_default_branch<S: Into<String>>(mut self, branch: S) -> Self {
        self.git.default_branch = branch.into();
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.git.executable.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "executable must not be empty".to_string(),
            ));
        }

        if self.git.default_remote.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "default_remote must not be empty".to_string(),
            ));
        }

        if self.git.default_branch.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "default_branch must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
