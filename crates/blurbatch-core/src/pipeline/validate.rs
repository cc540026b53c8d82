//! Cheap pre-decode checks: existence and size limit.
//!
//! Format detection is left to the decoder, which sniffs the content and
//! accepts everything the `image` crate can read.

use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Validates files before they are handed to the decoder.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Check that `path` exists and fits the size limit.
    ///
    /// Returns the file size in bytes.
    pub fn validate(&self, path: &Path) -> Result<u64, PipelineError> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PipelineError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(PipelineError::Decode {
                    path: path.to_path_buf(),
                    message: format!("Cannot read metadata: {e}"),
                });
            }
        };

        if metadata.len() > self.max_bytes() {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / BYTES_PER_MB,
                max_mb: self.limits.max_file_size_mb,
            });
        }

        Ok(metadata.len())
    }

    fn max_bytes(&self) -> u64 {
        self.limits.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_file_size_mb: u64) -> LimitsConfig {
        LimitsConfig {
            max_file_size_mb,
            ..LimitsConfig::default()
        }
    }

    #[test]
    fn test_validate_missing_file() {
        let validator = Validator::new(LimitsConfig::default());
        let err = validator
            .validate(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_validate_returns_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, [0u8; 42]).unwrap();

        let validator = Validator::new(LimitsConfig::default());
        assert_eq!(validator.validate(&path).unwrap(), 42);
    }

    #[test]
    fn test_validate_file_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, vec![0u8; (BYTES_PER_MB + 1) as usize]).unwrap();

        let err = Validator::new(limits(1)).validate(&path).unwrap_err();
        assert!(matches!(err, PipelineError::FileTooLarge { max_mb: 1, .. }));
    }

    #[test]
    fn test_huge_limit_saturates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"small").unwrap();

        let validator = Validator::new(limits(1 << 50));
        assert_eq!(validator.max_bytes(), u64::MAX);
        assert_eq!(validator.validate(&path).unwrap(), 5);
    }
}
