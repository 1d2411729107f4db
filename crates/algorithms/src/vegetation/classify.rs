//! Vegetation health classification of rendered index colours
//!
//! The imagery this consumes is already an index rendering: each pixel's
//! colour encodes a vegetation class. Classification reads the class back
//! from the colour with a fixed decision table, so the index value here is
//! an approximation per class, not a spectral measurement.

use canopy_core::raster::{PixelMask, Raster, RasterImage};
use canopy_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Vegetation health class of a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthBucket {
    Healthy,
    Moderate,
    Sparse,
    Barren,
}

impl HealthBucket {
    pub const ALL: [HealthBucket; 4] = [Self::Healthy, Self::Moderate, Self::Sparse, Self::Barren];

    /// Approximate vegetation index carried by a pixel of this class
    pub fn index_value(self) -> f64 {
        match self {
            Self::Healthy => 0.7,
            Self::Moderate => 0.5,
            Self::Sparse => 0.3,
            Self::Barren => 0.1,
        }
    }

    /// Cell value in a class raster; 0 is reserved for "outside the parcel"
    pub fn code(self) -> u8 {
        match self {
            Self::Healthy => 1,
            Self::Moderate => 2,
            Self::Sparse => 3,
            Self::Barren => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Moderate => "moderate",
            Self::Sparse => "sparse",
            Self::Barren => "barren",
        }
    }
}

/// Classify a colour with channels normalized to [0, 1].
///
/// First match wins:
///
/// | condition                     | class    |
/// |-------------------------------|----------|
/// | r > 0.5, g > 0.5, b < 0.5     | sparse   |
/// | g > 0.7, r < 0.6, b < 0.4     | moderate |
/// | g > 0.5, r < 0.3, b < 0.3     | healthy  |
/// | anything else                 | barren   |
///
/// Total: every input, NaN included, lands in exactly one class.
pub fn classify_rgb(r: f64, g: f64, b: f64) -> HealthBucket {
    if r > 0.5 && g > 0.5 && b < 0.5 {
        HealthBucket::Sparse
    } else if g > 0.7 && r < 0.6 && b < 0.4 {
        HealthBucket::Moderate
    } else if g > 0.5 && r < 0.3 && b < 0.3 {
        HealthBucket::Healthy
    } else {
        HealthBucket::Barren
    }
}

/// Classify an RGBA8 sample; alpha is ignored
pub fn classify_sample(rgba: [u8; 4]) -> HealthBucket {
    let [r, g, b, _] = rgba;
    classify_rgb(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    )
}

/// Classify every in-mask pixel of an image into a class raster.
///
/// Cells outside the mask hold 0, inside cells hold [`HealthBucket::code`].
/// The raster inherits the mask's geotransform and declares 0 as no-data.
pub fn classify_image(image: &RasterImage, mask: &PixelMask) -> Result<Raster<u8>> {
    let (width, height) = image.dimensions();
    if (mask.width(), mask.height()) != (width, height) {
        return Err(Error::SizeMismatch {
            er: height,
            ec: width,
            ar: mask.height(),
            ac: mask.width(),
        });
    }

    let mut classes = mask.as_raster().with_same_meta::<u8>(height, width);
    classes.set_nodata(Some(0));
    let cells = classes.data_mut();

    for y in 0..height {
        for x in 0..width {
            if !mask.contains(x, y) {
                continue;
            }
            if let Some(rgba) = image.pixel(x, y) {
                cells[(y, x)] = classify_sample(rgba).code();
            }
        }
    }

    Ok(classes)
}
