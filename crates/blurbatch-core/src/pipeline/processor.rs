//! Per-task pipeline: decode, blur every channel, rewrite the path, encode.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::PipelineResult;

use super::blur::blur_image;
use super::codec::{Codec, RasterCodec};
use super::paths::OutputPathMapper;

/// Runs one image through the blur pipeline.
///
/// Holds no locks and no per-image state, so a single processor is shared by
/// all workers.
pub struct ImageProcessor {
    codec: Arc<dyn Codec>,
    mapper: OutputPathMapper,
    filter_size: usize,
}

impl ImageProcessor {
    /// Create a processor that uses the `image`-crate codec.
    pub fn new(config: &Config) -> Self {
        Self::with_codec(config, Arc::new(RasterCodec::new(config)))
    }

    /// Create a processor around a custom codec.
    pub fn with_codec(config: &Config, codec: Arc<dyn Codec>) -> Self {
        Self {
            codec,
            mapper: OutputPathMapper::new(config.input_dir(), config.output_dir()),
            filter_size: config.blur.filter_size,
        }
    }

    /// Blur the image at `source` and write it under the output directory.
    ///
    /// Returns the path written.
    pub fn process_one(&self, source: &Path) -> PipelineResult<PathBuf> {
        let start = Instant::now();
        tracing::debug!("Processing: {:?}", source);

        let decode_start = Instant::now();
        let image = self.codec.decode(source)?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        let blur_start = Instant::now();
        let blurred = blur_image(&image, self.filter_size);
        tracing::trace!("  Blur: {:?}", blur_start.elapsed());

        let destination = self.mapper.output_path(source)?;

        let encode_start = Instant::now();
        self.codec.encode(&destination, &blurred)?;
        tracing::trace!("  Encode: {:?}", encode_start.elapsed());

        tracing::debug!(
            "Processed {:?} -> {:?} in {:?} ({}x{})",
            source,
            destination,
            start.elapsed(),
            blurred.width(),
            blurred.height()
        );
        Ok(destination)
    }
}
