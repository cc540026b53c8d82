//! Configuration management for blurbatch.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every field. Values are fixed for the lifetime of the process.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output directories
    pub directories: DirectoryConfig,

    /// Blur kernel settings
    pub blur: BlurConfig,

    /// Scanner and worker pool settings
    pub pool: PoolConfig,

    /// File discovery settings
    pub processing: ProcessingConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.blurbatch.blurbatch/config.toml
    /// - Linux: ~/.config/blurbatch/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\blurbatch\config\config.toml
    ///
    /// Falls back to ~/.blurbatch/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "blurbatch", "blurbatch")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".blurbatch").join("config.toml")
            })
    }

    /// Resolved input directory (with ~ expansion).
    pub fn input_dir(&self) -> PathBuf {
        expand(&self.directories.input_dir)
    }

    /// Resolved output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        expand(&self.directories.output_dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.blur.filter_size, 5);
        assert_eq!(config.blur.channel_count, 3);
        assert_eq!(config.pool.producer_count, 1);
        assert_eq!(config.pool.consumer_count, 10);
        assert_eq!(config.pool.queue_capacity, 1000);
        assert_eq!(config.pool.rescan, RescanPolicy::Always);
        assert_eq!(config.pool.on_error, FailurePolicy::Skip);
        assert!(config.pool.max_passes.is_none());
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[directories]"));
        assert!(toml.contains("[blur]"));
        assert!(toml.contains("[pool]"));
        assert!(toml.contains("rescan = \"always\""));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [directories]
            input_dir = "/data/in"
            output_dir = "/data/out"

            [pool]
            consumer_count = 4
            rescan = "skip_processed"
            max_passes = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.input_dir(), PathBuf::from("/data/in"));
        assert_eq!(config.pool.consumer_count, 4);
        assert_eq!(config.pool.queue_capacity, 1000);
        assert_eq!(config.pool.rescan, RescanPolicy::SkipProcessed);
        assert_eq!(config.pool.max_passes, Some(2));
        assert_eq!(config.blur, BlurConfig::default());
    }

    #[test]
    fn test_from_toml_validates() {
        let err = Config::from_toml("[blur]\nfilter_size = 4\n").unwrap_err();
        assert!(err.to_string().contains("filter_size"));
    }

    #[test]
    fn test_tilde_expansion() {
        let mut config = Config::default();
        config.directories.input_dir = PathBuf::from("~/pictures");
        assert!(!config.input_dir().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_pad() {
        assert_eq!(BlurConfig::default().pad(), 2);
        let blur = BlurConfig {
            filter_size: 1,
            channel_count: 1,
        };
        assert_eq!(blur.pad(), 0);
    }
}
