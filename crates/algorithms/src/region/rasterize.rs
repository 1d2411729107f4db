//! Polygon rasterization
//!
//! Fills a parcel ring into a [`PixelMask`] over a canvas that spans a
//! bounding box. A pixel belongs to the parcel iff its centre lies inside
//! the ring under the even-odd rule.

use canopy_core::geo::{BoundingBox, PolygonRing};
use canopy_core::raster::{GeoTransform, PixelMask};
use canopy_core::{Error, Result};

/// Project a ring onto a `width x height` canvas spanning `bbox`.
///
/// Returns the pixel-space path `(x, y)` with
/// `x = (lon - min_lon) / lon_span * width` and
/// `y = (max_lat - lat) / lat_span * height`. Vertices outside the box map
/// outside `[0, width) x [0, height)`; nothing is clipped here.
///
/// The spans of a [`BoundingBox`] are always positive, so any box, however
/// small, projects to finite coordinates.
pub fn project_ring(
    bbox: &BoundingBox,
    ring: &PolygonRing,
    width: usize,
    height: usize,
) -> Result<Vec<(f64, f64)>> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    let (w, h) = (width as f64, height as f64);
    let (lon_span, lat_span) = (bbox.lon_span(), bbox.lat_span());

    Ok(ring
        .vertices()
        .iter()
        .map(|c| {
            (
                (c.x - bbox.min_lon()) / lon_span * w,
                (bbox.max_lat() - c.y) / lat_span * h,
            )
        })
        .collect())
}

/// Rasterize a ring into a mask over a `width x height` canvas spanning `bbox`.
///
/// Scanline fill sampled at pixel centres with the even-odd rule. Edges use
/// a half-open rule in y so a vertex shared by two edges is counted once,
/// and horizontal edges never cross a scanline. Parts of the ring outside
/// the canvas are clipped.
///
/// A ring with fewer than three vertices or any non-finite coordinate gives
/// an empty mask.
///
/// # Errors
/// Only for an empty canvas (`width` or `height` of zero).
pub fn rasterize_ring(
    bbox: &BoundingBox,
    ring: &PolygonRing,
    width: usize,
    height: usize,
) -> Result<PixelMask> {
    let transform = GeoTransform::from_bbox(bbox, width, height)?;
    let mut mask = PixelMask::empty(width, height);
    mask.set_transform(transform);

    if !ring.is_region() {
        return Ok(mask);
    }

    let path = project_ring(bbox, ring, width, height)?;
    let n = path.len();
    let w = width as f64;
    let mut crossings: Vec<f64> = Vec::with_capacity(n);

    for row in 0..height {
        let yc = row as f64 + 0.5;

        crossings.clear();
        for i in 0..n {
            let (x0, y0) = path[i];
            let (x1, y1) = path[(i + 1) % n];
            if (y0 <= yc && yc < y1) || (y1 <= yc && yc < y0) {
                let t = (yc - y0) / (y1 - y0);
                crossings.push(x0 + t * (x1 - x0));
            }
        }
        crossings.sort_by(f64::total_cmp);

        // Pixel `col` is inside a span [a, b) iff a <= col + 0.5 < b
        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().clamp(0.0, w) as usize;
            let end = (span[1] - 0.5).ceil().clamp(0.0, w) as usize;
            mask.mark_span(row, start, end);
        }
    }

    Ok(mask)
}
