//! Configuration validation with range checks.

use image::ImageFormat;

use crate::error::ConfigError;

use super::{Config, FailurePolicy};

/// Largest accepted `blur.filter_size`.
pub const MAX_FILTER_SIZE: usize = 255;

/// Largest accepted `limits.max_file_size_mb` (1 TiB).
pub const MAX_FILE_SIZE_MB: u64 = 1 << 20;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blur.filter_size == 0 || self.blur.filter_size % 2 == 0 {
            return Err(ConfigError::ValidationError(
                "blur.filter_size must be an odd number > 0".into(),
            ));
        }
        if self.blur.filter_size > MAX_FILTER_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "blur.filter_size must be <= {MAX_FILTER_SIZE}"
            )));
        }
        if !(1..=4).contains(&self.blur.channel_count) {
            return Err(ConfigError::ValidationError(
                "blur.channel_count must be between 1 and 4".into(),
            ));
        }
        if self.pool.producer_count == 0 {
            return Err(ConfigError::ValidationError(
                "pool.producer_count must be > 0".into(),
            ));
        }
        if self.pool.consumer_count == 0 {
            return Err(ConfigError::ValidationError(
                "pool.consumer_count must be > 0".into(),
            ));
        }
        if self.pool.queue_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "pool.queue_capacity must be > 0".into(),
            ));
        }
        if self.pool.max_passes == Some(0) {
            return Err(ConfigError::ValidationError(
                "pool.max_passes must be > 0 when set".into(),
            ));
        }
        if self.pool.on_error == FailurePolicy::Retry && self.pool.retry_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "pool.retry_attempts must be > 0 when pool.on_error = \"retry\"".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 || self.limits.max_file_size_mb > MAX_FILE_SIZE_MB {
            return Err(ConfigError::ValidationError(format!(
                "limits.max_file_size_mb must be between 1 and {MAX_FILE_SIZE_MB}"
            )));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .processing
            .supported_formats
            .iter()
            .find(|ext| !is_decodable_extension(ext))
        {
            return Err(ConfigError::ValidationError(format!(
                "processing.supported_formats: no decoder for \"{ext}\""
            )));
        }
        if self.input_dir() == self.output_dir() {
            return Err(ConfigError::ValidationError(
                "directories.input_dir and directories.output_dir must differ".into(),
            ));
        }
        Ok(())
    }
}

fn is_decodable_extension(ext: &str) -> bool {
    ImageFormat::from_extension(ext).is_some_and(|format| format.reading_enabled())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_even_filter_size() {
        let mut config = Config::default();
        config.blur.filter_size = 4;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("filter_size"));

        config.blur.filter_size = 0;
        assert!(config.validate().is_err());

        config.blur.filter_size = MAX_FILTER_SIZE + 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_channel_count() {
        let mut config = Config::default();
        config.blur.channel_count = 0;
        assert!(config.validate().is_err());
        config.blur.channel_count = 5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("channel_count"));
    }

    #[test]
    fn test_validate_rejects_zero_pool_sizes() {
        let mut config = Config::default();
        config.pool.consumer_count = 0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("consumer_count"));

        let mut config = Config::default();
        config.pool.producer_count = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.pool.queue_capacity = 0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("queue_capacity"));
    }

    #[test]
    fn test_validate_rejects_zero_max_passes() {
        let mut config = Config::default();
        config.pool.max_passes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_retry_needs_attempts() {
        let mut config = Config::default();
        config.pool.on_error = FailurePolicy::Retry;
        config.pool.retry_attempts = 0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("retry_attempts"));
    }

    #[test]
    fn test_validate_rejects_same_directories() {
        let mut config = Config::default();
        config.directories.output_dir = config.directories.input_dir.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_file_size_bounds() {
        let mut config = Config::default();
        config.limits.max_file_size_mb = MAX_FILE_SIZE_MB;
        assert!(config.validate().is_ok());

        config.limits.max_file_size_mb = 1 << 50;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("max_file_size_mb"));
    }

    #[test]
    fn test_validate_accepts_any_decodable_format() {
        let mut config = Config::default();
        config
            .processing
            .supported_formats
            .extend(["qoi", "tga", "pnm", "ico"].map(String::from));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_format() {
        let mut config = Config::default();
        config.processing.supported_formats.push("txt".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("txt"));

        config.processing.supported_formats.clear();
        assert!(config.validate().is_err());
    }
}
