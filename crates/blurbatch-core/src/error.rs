//! Error types for the blurbatch pipeline.
//!
//! Errors are split by where they surface: configuration loading, one-time
//! directory setup before any thread starts, per-task pipeline failures, and
//! the bounded queue itself.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type for blurbatch operations.
#[derive(Error, Debug)]
pub enum BlurBatchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Directory setup errors, detected before the pool starts
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    /// Per-task pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Queue errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Input/output directory problems found when the pool starts.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Input directory does not exist: {0}")]
    MissingInputDirectory(PathBuf),

    #[error("Input path is not a directory: {0}")]
    InputPathNotDirectory(PathBuf),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectoryCreateFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output path exists but is not a directory: {0}")]
    OutputPathNotDirectory(PathBuf),

    /// The OS refused to start a scanner or worker thread
    #[error("Failed to spawn thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline processing errors, raised while a worker handles one task.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// The task path does not live under the input directory
    #[error("Cannot rewrite {path}: not under input directory {input_dir}")]
    PathRewrite { path: PathBuf, input_dir: PathBuf },

    /// Image encoding or writing failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

impl PipelineError {
    /// Path of the file this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::FileNotFound(path) => path,
            Self::FileTooLarge { path, .. }
            | Self::Decode { path, .. }
            | Self::UnsupportedFormat { path, .. }
            | Self::ImageTooLarge { path, .. }
            | Self::PathRewrite { path, .. }
            | Self::Encode { path, .. } => path,
        }
    }
}

/// Shape errors when assembling pixel grids and images.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("An image needs at least one channel")]
    NoChannels,

    #[error("Buffer holds {found} samples, expected {expected} for {height}x{width}")]
    BufferSize {
        height: usize,
        width: usize,
        expected: usize,
        found: usize,
    },

    #[error("Channel {channel} is {found_height}x{found_width}, expected {height}x{width}")]
    DimensionMismatch {
        channel: usize,
        height: usize,
        width: usize,
        found_height: usize,
        found_width: usize,
    },
}

/// Errors returned by [`BoundedQueue`](crate::queue::BoundedQueue) operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was closed; no further items are accepted.
    #[error("Queue is closed")]
    Closed,

    /// A bounded wait elapsed before the operation could proceed.
    #[error("Queue operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Convenience type alias for blurbatch results.
pub type Result<T> = std::result::Result<T, BlurBatchError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_path() {
        let err = PipelineError::PathRewrite {
            path: PathBuf::from("/elsewhere/a.png"),
            input_dir: PathBuf::from("/data/in"),
        };
        assert_eq!(err.path(), std::path::Path::new("/elsewhere/a.png"));
        assert!(err.to_string().contains("/data/in"));
    }

    #[test]
    fn test_setup_error_converts_to_top_level() {
        let err: BlurBatchError = SetupError::MissingInputDirectory(PathBuf::from("in")).into();
        assert!(matches!(err, BlurBatchError::Setup(_)));
        assert!(err.to_string().contains("does not exist"));
    }
}
