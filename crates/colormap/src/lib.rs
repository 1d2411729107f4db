//! # Canopy Colormap
//!
//! Vegetation index rendering for Canopy.
//!
//! Turns an NDVI raster into the stepped four-class palette image that the
//! vegetation classifier reads back, and strokes parcel outlines on top.
//!
//! ## Usage
//!
//! ```ignore
//! use canopy_colormap::{render_vegetation_palette, VegetationPalette};
//!
//! let image = render_vegetation_palette(&ndvi, &VegetationPalette::default())?;
//! ```

mod overlay;
mod palette;
mod render;

pub use overlay::{draw_outline, OUTLINE_COLOR, OUTLINE_WIDTH};
pub use palette::{Rgb, VegetationPalette};
pub use render::{render_vegetation_palette, OPAQUE};
