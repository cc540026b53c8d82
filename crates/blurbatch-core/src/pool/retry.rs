//! Retry classification and backoff for failed tasks.

use crate::error::PipelineError;
use std::time::Duration;

/// Whether a failed task might succeed if tried again.
///
/// Decode and encode failures can come from a file that is still being
/// written or a transient I/O error. Everything else (missing files, bad
/// paths, unsupported formats, limit violations) fails the same way every time.
pub fn is_retryable(error: &PipelineError) -> bool {
    matches!(
        error,
        PipelineError::Decode { .. } | PipelineError::Encode { .. }
    )
}

/// Exponential backoff: `base_delay * 2^attempt`, capped at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_decode_and_encode_are_retryable() {
        let decode = PipelineError::Decode {
            path: PathBuf::from("a.png"),
            message: "unexpected EOF".to_string(),
        };
        let encode = PipelineError::Encode {
            path: PathBuf::from("a.png"),
            message: "disk full".to_string(),
        };
        assert!(is_retryable(&decode));
        assert!(is_retryable(&encode));
    }

    #[test]
    fn test_deterministic_errors_are_not_retryable() {
        let rewrite = PipelineError::PathRewrite {
            path: PathBuf::from("/x/a.png"),
            input_dir: PathBuf::from("/in"),
        };
        assert!(!is_retryable(&rewrite));
        assert!(!is_retryable(&PipelineError::FileNotFound(PathBuf::from(
            "a.png"
        ))));
        assert!(!is_retryable(&PipelineError::UnsupportedFormat {
            path: PathBuf::from("a.txt"),
            format: "txt".to_string(),
        }));
    }

    #[test]
    fn test_backoff_exponential() {
        assert_eq!(backoff_duration(0, 500), Duration::from_millis(500));
        assert_eq!(backoff_duration(1, 500), Duration::from_millis(1000));
        assert_eq!(backoff_duration(3, 500), Duration::from_millis(4000));
    }

    #[test]
    fn test_backoff_capped_at_30s() {
        assert_eq!(backoff_duration(10, 1000), Duration::from_millis(30_000));
        assert_eq!(backoff_duration(u32::MAX, u64::MAX), Duration::from_millis(30_000));
    }
}
