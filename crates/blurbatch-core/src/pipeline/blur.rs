//! Box-blur kernel for single 8-bit channels.
//!
//! Every interior pixel becomes the truncated mean of a `filter_size x
//! filter_size` window whose first row and column sit `pad = filter_size / 2`
//! samples before the pixel. A frame `pad` pixels wide around the grid is
//! copied from the source untouched.
//!
//! Window sums come from a summed-area table, so the cost per pixel does not
//! depend on the filter size.

use crate::types::{Image, PixelGrid};

/// Blur one channel. The result has the same dimensions as the input.
///
/// A `filter_size` of 0 or 1, or a grid too small to have an interior, returns
/// a copy of the input.
pub fn apply_box_blur(channel: &PixelGrid, filter_size: usize) -> PixelGrid {
    let mut out = channel.clone();
    if filter_size <= 1 {
        return out;
    }

    let pad = filter_size / 2;
    let (height, width) = channel.dimensions();
    if height <= 2 * pad || width <= 2 * pad {
        return out;
    }

    let table = SummedAreaTable::new(channel);
    let area = (filter_size * filter_size) as u64;

    for x in pad..height - pad {
        let top = x - pad;
        for y in pad..width - pad {
            let left = y - pad;
            let sum = table.window_sum(top, left, filter_size);
            out.set(x, y, (sum / area) as u8);
        }
    }
    out
}

/// Blur every channel of an image with the same filter size.
pub fn blur_image(image: &Image, filter_size: usize) -> Image {
    image.map_channels(|channel| apply_box_blur(channel, filter_size))
}

/// Inclusive prefix sums with a zero guard row and column.
struct SummedAreaTable {
    stride: usize,
    sums: Vec<u64>,
}

impl SummedAreaTable {
    fn new(grid: &PixelGrid) -> Self {
        let (height, width) = grid.dimensions();
        let stride = width + 1;
        let mut sums = vec![0u64; (height + 1) * stride];
        for r in 0..height {
            let mut row_sum = 0u64;
            for (c, &sample) in grid.row(r).iter().enumerate() {
                row_sum += u64::from(sample);
                sums[(r + 1) * stride + c + 1] = sums[r * stride + c + 1] + row_sum;
            }
        }
        Self { stride, sums }
    }

    /// Sum of the `size x size` window whose top-left sample is `(top, left)`.
    fn window_sum(&self, top: usize, left: usize, size: usize) -> u64 {
        let bottom = top + size;
        let right = left + size;
        let at = |r: usize, c: usize| self.sums[r * self.stride + c];
        at(bottom, right) + at(top, left) - at(top, right) - at(bottom, left)
    }
}
