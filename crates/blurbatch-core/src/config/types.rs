//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source and destination directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Directory scanned for images (must already exist)
    pub input_dir: PathBuf,

    /// Directory blurred images are written to (created if absent)
    pub output_dir: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input"),
            output_dir: PathBuf::from("./output"),
        }
    }
}

/// Box-blur kernel settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Window side length in pixels; must be odd
    pub filter_size: usize,

    /// Channels decoded, blurred and written per image (1-4)
    pub channel_count: usize,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            filter_size: 5,
            channel_count: 3,
        }
    }
}

impl BlurConfig {
    /// Width of the unblurred border frame.
    pub fn pad(&self) -> usize {
        self.filter_size / 2
    }
}

/// What a scanner does with files it has already enqueued on earlier passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RescanPolicy {
    /// Re-enqueue every file on every pass.
    #[default]
    Always,
    /// Re-enqueue a file only when its content hash changed since it was last enqueued.
    SkipProcessed,
}

/// What a worker does when a task fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the error and move on to the next task.
    #[default]
    Skip,
    /// Retry retryable errors with exponential backoff, then log and move on.
    Retry,
}

/// Scanner / worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of scanner threads
    pub producer_count: usize,

    /// Number of worker threads
    pub consumer_count: usize,

    /// Max tasks buffered between scanners and workers
    pub queue_capacity: usize,

    /// Pause between full directory passes in milliseconds
    pub poll_interval_ms: u64,

    /// Rescan behaviour for files seen on earlier passes
    pub rescan: RescanPolicy,

    /// Stop each scanner after this many passes (unset = scan forever)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_passes: Option<u64>,

    /// Per-task failure handling
    pub on_error: FailurePolicy,

    /// Max retry attempts when `on_error = "retry"`
    pub retry_attempts: u32,

    /// Base delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            producer_count: 1,
            consumer_count: 10,
            queue_capacity: 1000,
            poll_interval_ms: 1000,
            rescan: RescanPolicy::Always,
            max_passes: None,
            on_error: FailurePolicy::Skip,
            retry_attempts: 3,
            retry_delay_ms: 500,
        }
    }
}

/// File discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// File extensions picked up by the scanner (case-insensitive)
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "bmp".to_string(),
                "gif".to_string(),
                "tif".to_string(),
                "tiff".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
