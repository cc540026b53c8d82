//! blurbatch core - a directory-watching box-blur pipeline.
//!
//! A scanner thread repeatedly lists an input directory and pushes every
//! image path onto a fixed-capacity queue. A pool of worker threads pops
//! paths, blurs each channel with a box filter and writes the result under
//! the output directory.
//!
//! # Architecture
//!
//! ```text
//! Scanner → BoundedQueue → Worker → Decode → Box blur (per channel) → Encode → output dir
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use blurbatch_core::{Config, Coordinator};
//!
//! fn main() -> blurbatch_core::Result<()> {
//!     let mut config = Config::load()?;
//!     config.pool.max_passes = Some(1);
//!
//!     let stats = Coordinator::new(config).start()?.join();
//!     println!("Blurred {} images", stats.succeeded);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pool;
pub mod queue;
pub mod types;

// Re-exports for convenient access
pub use config::{BlurConfig, Config, FailurePolicy, RescanPolicy};
pub use error::{
    BlurBatchError, ConfigError, ImageError, PipelineError, PipelineResult, QueueError, Result,
    SetupError,
};
pub use pipeline::{apply_box_blur, blur_image, Codec, ImageProcessor, RasterCodec};
pub use pool::{Coordinator, PoolHandle, ProcessingStats, ShutdownHandle, StopSignal};
pub use queue::BoundedQueue;
pub use types::{Image, PixelGrid, Task};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
