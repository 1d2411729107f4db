//! Affine geotransformation between canvas pixels and lon/lat

use crate::error::{Error, Result};
use crate::geo::BoundingBox;
use serde::{Deserialize, Serialize};

/// North-up affine transformation for georeferencing a canvas.
///
/// Converts between pixel coordinates (col, row) and geographic coordinates
/// (lon, lat):
/// ```text
/// lon = origin_x + col * pixel_width
/// lat = origin_y + row * pixel_height
/// ```
///
/// `pixel_height` is negative because raster rows grow downward while
/// latitude grows northward. The mapping is linear (equirectangular), which
/// is adequate at parcel scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// Longitude of the upper-left corner
    pub origin_x: f64,
    /// Latitude of the upper-left corner
    pub origin_y: f64,
    /// Degrees of longitude per column
    pub pixel_width: f64,
    /// Degrees of latitude per row (negative for north-up)
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a new north-up GeoTransform
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Build the transform that stretches `bbox` over a `width x height` canvas.
    ///
    /// The upper-left corner is `(min_lon, max_lat)`, so
    /// `x = (lon - min_lon) / lon_span * width` and
    /// `y = (max_lat - lat) / lat_span * height`.
    pub fn from_bbox(bbox: &BoundingBox, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self::new(
            bbox.min_lon(),
            bbox.max_lat(),
            bbox.lon_span() / width as f64,
            -bbox.lat_span() / height as f64,
        ))
    }

    /// Convert pixel coordinates to geographic coordinates
    ///
    /// Returns the coordinates of the pixel center
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.pixel_to_geo_f(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Convert pixel coordinates to geographic coordinates (top-left corner)
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        self.pixel_to_geo_f(col as f64, row as f64)
    }

    fn pixel_to_geo_f(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width,
            self.origin_y + row * self.pixel_height,
        )
    }

    /// Convert geographic coordinates to pixel coordinates
    ///
    /// Returns fractional pixel coordinates; use `.floor()` to get integer indices
    pub fn geo_to_pixel(&self, lon: f64, lat: f64) -> (f64, f64) {
        if self.pixel_width.abs() < 1e-15 || self.pixel_height.abs() < 1e-15 {
            // Degenerate transformation
            return (f64::NAN, f64::NAN);
        }

        let col = (lon - self.origin_x) / self.pixel_width;
        let row = (lat - self.origin_y) / self.pixel_height;

        (col, row)
    }

    /// Geographic bounds of a `width x height` grid as (min_x, min_y, max_x, max_y)
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.pixel_to_geo_corner(0, 0);
        let (x1, y1) = self.pixel_to_geo_corner(width, height);

        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}
