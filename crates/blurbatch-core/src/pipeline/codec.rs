//! The decode/encode boundary between the pipeline and raster file formats.

use std::path::Path;

use crate::config::Config;
use crate::error::PipelineResult;
use crate::types::Image;

use super::decode::ImageDecoder;
use super::encode::ImageEncoder;
use super::validate::Validator;

/// Reads and writes images on behalf of the pipeline.
///
/// Implementations are shared by every worker thread.
pub trait Codec: Send + Sync {
    /// Load the file at `path` into an [`Image`].
    fn decode(&self, path: &Path) -> PipelineResult<Image>;

    /// Write `image` to `path` in a lossless format.
    fn encode(&self, path: &Path, image: &Image) -> PipelineResult<()>;
}

/// [`Codec`] backed by the `image` crate: validates, decodes any supported
/// raster format and encodes PNG.
pub struct RasterCodec {
    validator: Validator,
    decoder: ImageDecoder,
    encoder: ImageEncoder,
}

impl RasterCodec {
    pub fn new(config: &Config) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone(), config.blur.channel_count),
            encoder: ImageEncoder::new(),
        }
    }
}

impl Codec for RasterCodec {
    fn decode(&self, path: &Path) -> PipelineResult<Image> {
        let size = self.validator.validate(path)?;
        tracing::trace!("  Validated {:?} ({} bytes)", path, size);
        self.decoder.decode(path)
    }

    fn encode(&self, path: &Path, image: &Image) -> PipelineResult<()> {
        self.encoder.encode(path, image)
    }
}
