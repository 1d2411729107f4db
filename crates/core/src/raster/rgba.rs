//! RGBA sample buffers

use crate::error::{Error, Result};

/// Bytes per RGBA sample
pub const CHANNELS: usize = 4;

/// A `width x height` grid of RGBA8 samples, row-major, origin top-left.
///
/// This is the plain value form of a rendered map or satellite tile: no
/// georeferencing, no colour space, just the bytes. Pair it with a
/// [`BoundingBox`](crate::geo::BoundingBox) to know where it lies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA buffer, checking that it holds exactly `width * height` samples
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height * CHANNELS {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create an image where every sample is `rgba`
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width * height * CHANNELS)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Dimensions as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Sample at column `x`, row `y`
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Overwrite the sample at column `x`, row `y`
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                row: y,
                col: x,
                rows: self.height,
                cols: self.width,
            });
        }
        let i = (y * self.width + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
        Ok(())
    }

    /// Paint the half-open rectangle `[x0, x1) x [y0, y1)`, clipped to the image
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, rgba: [u8; 4]) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = (y * self.width + x) * CHANNELS;
                self.data[i..i + CHANNELS].copy_from_slice(&rgba);
            }
        }
    }

    /// Raw bytes of row `y` (`width * 4` long)
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width * CHANNELS;
        Some(&self.data[y * stride..(y + 1) * stride])
    }

    /// Iterate over all samples in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.data
    }
}
