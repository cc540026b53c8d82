//! Image decoding into per-channel pixel grids.

use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::Image;

/// Decodes image files into `channel_count` 8-bit channels.
///
/// Sources with a different channel layout are converted: grayscale is
/// expanded to RGB, alpha is dropped or added as needed.
pub struct ImageDecoder {
    limits: LimitsConfig,
    channel_count: usize,
}

impl ImageDecoder {
    pub fn new(limits: LimitsConfig, channel_count: usize) -> Self {
        Self {
            limits,
            channel_count,
        }
    }

    /// Decode the file at `path`. The format is detected from the content.
    pub fn decode(&self, path: &Path) -> Result<Image, PipelineError> {
        let decode_err = |message: String| PipelineError::Decode {
            path: path.to_path_buf(),
            message,
        };

        let reader = ImageReader::open(path)
            .map_err(|e| decode_err(format!("Cannot open file: {e}")))?
            .with_guessed_format()
            .map_err(|e| decode_err(format!("Cannot detect image format: {e}")))?;
        if reader.format().is_none() {
            return Err(PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            });
        }

        let decoded = reader.decode().map_err(|e| decode_err(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim,
            });
        }

        let samples = self.interleaved_samples(decoded).ok_or_else(|| {
            decode_err(format!("Unsupported channel count {}", self.channel_count))
        })?;
        Image::from_interleaved(
            height as usize,
            width as usize,
            self.channel_count,
            &samples,
        )
        .map_err(|e| decode_err(e.to_string()))
    }

    fn interleaved_samples(&self, decoded: DynamicImage) -> Option<Vec<u8>> {
        let samples = match self.channel_count {
            1 => decoded.into_luma8().into_raw(),
            2 => decoded.into_luma_alpha8().into_raw(),
            3 => decoded.into_rgb8().into_raw(),
            4 => decoded.into_rgba8().into_raw(),
            _ => return None,
        };
        Some(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 7]));
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_decode_splits_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "gradient.png", 4, 3);

        let decoder = ImageDecoder::new(LimitsConfig::default(), 3);
        let image = decoder.decode(&path).unwrap();

        assert_eq!((image.height(), image.width()), (3, 4));
        assert_eq!(image.channel(0).unwrap().get(2, 3), 3); // x
        assert_eq!(image.channel(1).unwrap().get(2, 3), 2); // y
        assert_eq!(image.channel(2).unwrap().get(2, 3), 7);
    }

    #[test]
    fn test_decode_converts_to_grayscale() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "rgb.png", 5, 5);

        let decoder = ImageDecoder::new(LimitsConfig::default(), 1);
        let image = decoder.decode(&path).unwrap();
        assert_eq!(image.channel_count(), 1);
    }

    #[test]
    fn test_decode_rejects_oversized_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "wide.png", 40, 2);

        let limits = LimitsConfig {
            max_image_dimension: 32,
            ..LimitsConfig::default()
        };
        let err = ImageDecoder::new(limits, 3).decode(&path).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ImageTooLarge {
                width: 40,
                height: 2,
                max_dim: 32,
                ..
            }
        ));
    }

    #[test]
    fn test_format_detected_by_content() {
        // PNG bytes behind a .jpg name still decode.
        let dir = tempfile::tempdir().unwrap();
        let png = write_image(dir.path(), "real.png", 3, 3);
        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png, &misnamed).unwrap();

        let image = ImageDecoder::new(LimitsConfig::default(), 3)
            .decode(&misnamed)
            .unwrap();
        assert_eq!(image.width(), 3);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nthen nonsense").unwrap();

        let err = ImageDecoder::new(LimitsConfig::default(), 3)
            .decode(&path)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_decode_text_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, "not an image at all").unwrap();

        let err = ImageDecoder::new(LimitsConfig::default(), 3)
            .decode(&path)
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_decode_qoi() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "a.qoi", 8, 6);

        let image = ImageDecoder::new(LimitsConfig::default(), 3)
            .decode(&path)
            .unwrap();
        assert_eq!((image.height(), image.width()), (6, 8));
        assert_eq!(image.channel(0).unwrap().get(5, 7), 7);
    }
}
