//! Region masks over a canvas

use crate::raster::{GeoTransform, Raster};
use ndarray::ArrayView1;

/// Alpha written for cells inside the region
pub const INSIDE: u8 = 255;

/// A `width x height` alpha grid marking which canvas pixels belong to a region.
///
/// A pixel is in the region iff its alpha is non-zero. The mask carries the
/// geotransform of the canvas it was rasterized against.
#[derive(Debug, Clone)]
pub struct PixelMask {
    alpha: Raster<u8>,
}

impl PixelMask {
    /// A mask with no pixel marked
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            alpha: Raster::new(height, width),
        }
    }

    /// Wrap an existing alpha raster
    pub fn from_raster(alpha: Raster<u8>) -> Self {
        Self { alpha }
    }

    pub fn width(&self) -> usize {
        self.alpha.cols()
    }

    pub fn height(&self) -> usize {
        self.alpha.rows()
    }

    pub fn transform(&self) -> &GeoTransform {
        self.alpha.transform()
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.alpha.set_transform(transform);
    }

    /// Whether pixel (x, y) is inside the region; out-of-canvas pixels never are
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.alpha.get(y, x).map(|a| a != 0).unwrap_or(false)
    }

    /// Mark the half-open span `[x0, x1)` of row `y`, clipped to the canvas
    pub fn mark_span(&mut self, y: usize, x0: usize, x1: usize) {
        if y >= self.height() {
            return;
        }
        let x1 = x1.min(self.width());
        if x0 >= x1 {
            return;
        }
        let data = self.alpha.data_mut();
        for x in x0..x1 {
            data[(y, x)] = INSIDE;
        }
    }

    /// Alpha values of row `y`
    pub fn row(&self, y: usize) -> Option<ArrayView1<'_, u8>> {
        self.alpha.row(y).ok()
    }

    /// Number of pixels inside the region
    pub fn count(&self) -> usize {
        self.alpha.data().iter().filter(|&&a| a != 0).count()
    }

    /// Whether no pixel is inside the region
    pub fn is_blank(&self) -> bool {
        self.alpha.data().iter().all(|&a| a == 0)
    }

    pub fn as_raster(&self) -> &Raster<u8> {
        &self.alpha
    }

    pub fn into_raster(self) -> Raster<u8> {
        self.alpha
    }
}
