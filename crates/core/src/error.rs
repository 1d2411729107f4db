//! Error types for Canopy

use thiserror::Error;

/// Main error type for Canopy operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Invalid bounding box: lon [{min_lon}, {max_lon}], lat [{min_lat}, {max_lat}]")]
    InvalidBoundingBox {
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
    },

    #[error("Raster has no georeference (ModelPixelScale/ModelTiepoint tags)")]
    MissingGeoreference,

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Canopy operations
pub type Result<T> = std::result::Result<T, Error>;
