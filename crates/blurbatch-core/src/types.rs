//! Core data types: tasks, single-channel pixel grids and multi-channel images.

use std::path::{Path, PathBuf};

use crate::error::ImageError;

/// One unit of work: the path of an image waiting to be blurred.
///
/// Tasks are immutable. The queue owns a task until it is popped; from then on
/// the popping worker owns it until processing finishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    path: PathBuf,
}

impl Task {
    /// Create a task for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the source image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the task, returning its path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// A `height x width` grid of 8-bit samples for a single channel, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    height: usize,
    width: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Create a zero-filled grid.
    pub fn new(height: usize, width: usize) -> Self {
        Self::filled(height, width, 0)
    }

    /// Create a grid with every sample set to `value`.
    pub fn filled(height: usize, width: usize, value: u8) -> Self {
        Self {
            height,
            width,
            data: vec![value; height * width],
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_raw(height: usize, width: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = height * width;
        if data.len() != expected {
            return Err(ImageError::BufferSize {
                height,
                width,
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Build a grid by evaluating `f(row, col)` for every sample.
    pub fn from_fn(height: usize, width: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            height,
            width,
            data,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Sample at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.height && col < self.width, "pixel out of bounds");
        self.data[row * self.width + col]
    }

    /// Overwrite the sample at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        assert!(row < self.height && col < self.width, "pixel out of bounds");
        self.data[row * self.width + col] = value;
    }

    /// One row of samples.
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

/// An ordered set of channels that all share the same dimensions.
///
/// Dimensions are fixed at construction; transformations produce new images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    channels: Vec<PixelGrid>,
}

impl Image {
    /// Assemble an image from its channels.
    ///
    /// Fails if there are no channels or any channel's dimensions differ from
    /// the first one's.
    pub fn from_channels(channels: Vec<PixelGrid>) -> Result<Self, ImageError> {
        let first = channels.first().ok_or(ImageError::NoChannels)?;
        let (height, width) = first.dimensions();
        for (index, channel) in channels.iter().enumerate().skip(1) {
            if channel.dimensions() != (height, width) {
                return Err(ImageError::DimensionMismatch {
                    channel: index,
                    height,
                    width,
                    found_height: channel.height(),
                    found_width: channel.width(),
                });
            }
        }
        Ok(Self { channels })
    }

    /// Split an interleaved buffer (`[c0, c1, .., c0, c1, ..]`) into channels.
    pub fn from_interleaved(
        height: usize,
        width: usize,
        channel_count: usize,
        samples: &[u8],
    ) -> Result<Self, ImageError> {
        if channel_count == 0 {
            return Err(ImageError::NoChannels);
        }
        let expected = height * width * channel_count;
        if samples.len() != expected {
            return Err(ImageError::BufferSize {
                height,
                width,
                expected,
                found: samples.len(),
            });
        }

        let mut planes = vec![Vec::with_capacity(height * width); channel_count];
        for pixel in samples.chunks_exact(channel_count) {
            for (plane, &sample) in planes.iter_mut().zip(pixel) {
                plane.push(sample);
            }
        }

        let channels = planes
            .into_iter()
            .map(|plane| PixelGrid::from_raw(height, width, plane))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_channels(channels)
    }

    /// Interleave the channels back into a single pixel-major buffer.
    pub fn to_interleaved(&self) -> Vec<u8> {
        let channel_count = self.channels.len();
        let pixels = self.height() * self.width();
        let mut out = vec![0u8; pixels * channel_count];
        for (c, channel) in self.channels.iter().enumerate() {
            for (i, &sample) in channel.as_slice().iter().enumerate() {
                out[i * channel_count + c] = sample;
            }
        }
        out
    }

    /// Apply `f` to every channel independently. `f` must preserve dimensions.
    pub(crate) fn map_channels(&self, f: impl FnMut(&PixelGrid) -> PixelGrid) -> Self {
        let channels: Vec<PixelGrid> = self.channels.iter().map(f).collect();
        debug_assert!(channels
            .iter()
            .all(|c| c.dimensions() == self.channels[0].dimensions()));
        Self { channels }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn height(&self) -> usize {
        self.channels[0].height()
    }

    pub fn width(&self) -> usize {
        self.channels[0].width()
    }

    pub fn channel(&self, index: usize) -> Option<&PixelGrid> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[PixelGrid] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<PixelGrid> {
        self.channels
    }
}
