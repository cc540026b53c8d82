//! Lossless PNG encoding of blurred images.

use image::{ExtendedColorType, ImageFormat};
use std::path::Path;

use crate::error::PipelineError;
use crate::types::Image;

/// Writes images as PNG regardless of the destination file's extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageEncoder;

impl ImageEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Interleave the channels of `image` and write them to `path`.
    pub fn encode(&self, path: &Path, image: &Image) -> Result<(), PipelineError> {
        let encode_err = |message: String| PipelineError::Encode {
            path: path.to_path_buf(),
            message,
        };

        let color = match image.channel_count() {
            1 => ExtendedColorType::L8,
            2 => ExtendedColorType::La8,
            3 => ExtendedColorType::Rgb8,
            4 => ExtendedColorType::Rgba8,
            n => return Err(encode_err(format!("Cannot encode {n} channels"))),
        };
        let width = u32::try_from(image.width())
            .map_err(|_| encode_err(format!("Width {} out of range", image.width())))?;
        let height = u32::try_from(image.height())
            .map_err(|_| encode_err(format!("Height {} out of range", image.height())))?;

        image::save_buffer_with_format(
            path,
            &image.to_interleaved(),
            width,
            height,
            color,
            ImageFormat::Png,
        )
        .map_err(|e| encode_err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelGrid;

    #[test]
    fn test_encode_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let image = Image::from_channels(vec![
            PixelGrid::filled(4, 6, 10),
            PixelGrid::filled(4, 6, 20),
            PixelGrid::filled(4, 6, 30),
        ])
        .unwrap();

        ImageEncoder::new().encode(&path, &image).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
        let reloaded = image::ImageReader::open(&path)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap()
            .into_rgb8();
        assert_eq!(reloaded.dimensions(), (6, 4));
        assert_eq!(reloaded.get_pixel(5, 3).0, [10, 20, 30]);
    }

    #[test]
    fn test_encode_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let image = Image::from_channels(vec![PixelGrid::filled(2, 2, 1)]).unwrap();

        let err = ImageEncoder::new().encode(&path, &image).unwrap_err();
        assert!(matches!(err, PipelineError::Encode { .. }));
    }
}
