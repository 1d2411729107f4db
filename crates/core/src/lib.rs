//! # Canopy Core
//!
//! Core types, traits and I/O for the Canopy vegetation estimator.
//!
//! This crate provides:
//! - `Raster<T>`: Generic georeferenced grid
//! - `GeoTransform`: Affine mapping between pixels and lon/lat
//! - `RasterImage` / `PixelMask`: RGBA samples and region masks on a canvas
//! - `BoundingBox` / `PolygonRing`: the geographic frame of a parcel
//! - Algorithm trait for a consistent API
//! - I/O for GeoTIFF bands and PNG images

pub mod error;
pub mod geo;
pub mod io;
pub mod raster;

pub use error::{Error, Result};
pub use geo::{BoundingBox, PolygonRing};
pub use raster::{GeoTransform, PixelMask, Raster, RasterElement, RasterImage};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geo::{BoundingBox, PolygonRing};
    pub use crate::raster::{GeoTransform, PixelMask, Raster, RasterElement, RasterImage};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in Canopy.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
