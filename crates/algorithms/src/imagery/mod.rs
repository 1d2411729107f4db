//! Imagery analysis algorithms
//!
//! Spectral indices computed from single-band rasters. NDVI is the input of
//! the vegetation palette rendering.

mod indices;

pub use indices::{ndvi, normalized_difference};
