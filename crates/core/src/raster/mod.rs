//! Raster data structures and operations

mod element;
mod geotransform;
mod grid;
mod rgba;
mod mask;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::Raster;
pub use rgba::{RasterImage, CHANNELS};
pub use mask::{PixelMask, INSIDE};
