//! Raster-to-RGBA rendering with the vegetation palette.

use crate::palette::VegetationPalette;
use canopy_core::raster::{Raster, RasterElement, RasterImage};
use canopy_core::Result;

/// Alpha of rendered data pixels; nodata pixels get 0.
pub const OPAQUE: u8 = 255;

/// Render an index raster (typically NDVI) into an RGBA image.
///
/// Image width is the raster's column count, height its row count. Nodata
/// and non-finite cells are fully transparent black, so alpha doubles as
/// the data mask.
///
/// # Errors
/// Only for an empty raster.
pub fn render_vegetation_palette<T: RasterElement>(
    raster: &Raster<T>,
    palette: &VegetationPalette,
) -> Result<RasterImage> {
    let (rows, cols) = raster.shape();
    let nodata = raster.nodata();
    let mut rgba = vec![0u8; rows * cols * 4];

    for (px, val) in rgba.chunks_exact_mut(4).zip(raster.data().iter()) {
        if val.is_nodata(nodata) {
            continue;
        }
        if let Some(rgb) = val
            .to_f64()
            .filter(|v| v.is_finite())
            .and_then(|v| palette.evaluate(v))
        {
            px.copy_from_slice(&rgb.to_rgba(OPAQUE));
        }
    }

    RasterImage::from_rgba(cols, rows, rgba)
}
