//! Bounding box framing
//!
//! Imagery for a parcel is requested for a box slightly larger than the
//! parcel, with exactly the canvas aspect ratio, so the returned image is
//! never stretched and one pixel covers the same angular size on both axes.

use canopy_core::geo::{BoundingBox, PolygonRing};
use canopy_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for framing a parcel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingParams {
    /// Multiplier applied to the raw extent so the boundary does not touch
    /// the image edges (default 1.2)
    pub padding_factor: f64,
    /// Smallest span in degrees on either axis after padding (default 0.005).
    /// Keeps a point or a sliver of a parcel from producing a degenerate box.
    pub min_span: f64,
    /// Span in degrees used when there is no ring yet (default 0.01)
    pub default_span: f64,
}

impl Default for FramingParams {
    fn default() -> Self {
        Self {
            padding_factor: 1.2,
            min_span: 0.005,
            default_span: 0.01,
        }
    }
}

impl FramingParams {
    pub fn validate(&self) -> Result<()> {
        if !self.padding_factor.is_finite() || self.padding_factor < 1.0 {
            return Err(Error::InvalidParameter {
                name: "padding_factor",
                value: self.padding_factor.to_string(),
                reason: "must be a finite factor >= 1".into(),
            });
        }
        for (name, value) in [("min_span", self.min_span), ("default_span", self.default_span)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidParameter {
                    name,
                    value: value.to_string(),
                    reason: "must be a positive number of degrees".into(),
                });
            }
        }
        Ok(())
    }
}

/// Frame a parcel ring for a `width x height` canvas.
///
/// 1. Take the raw lon/lat extent of the ring and its midpoint.
/// 2. Pad each span by `padding_factor`, flooring it at `min_span`.
/// 3. Grow whichever span is too short so that `lon_span / lat_span == width / height`.
///
/// Rings with one or two points still get a box (the span floor applies);
/// whether they enclose anything is decided later.
///
/// # Errors
/// `InvalidParameter` for an empty or non-finite ring, bad params or an
/// empty canvas.
pub fn frame_bbox(
    ring: &PolygonRing,
    width: usize,
    height: usize,
    params: &FramingParams,
) -> Result<BoundingBox> {
    params.validate()?;
    let (min_lon, max_lon, min_lat, max_lat) =
        ring.extent().ok_or_else(|| Error::InvalidParameter {
            name: "ring",
            value: format!("{} vertices", ring.len()),
            reason: "needs at least one finite vertex".into(),
        })?;

    let center_lon = (min_lon + max_lon) / 2.0;
    let center_lat = (min_lat + max_lat) / 2.0;
    let lon_span = ((max_lon - min_lon) * params.padding_factor).max(params.min_span);
    let lat_span = ((max_lat - min_lat) * params.padding_factor).max(params.min_span);

    fit_aspect(center_lon, center_lat, lon_span, lat_span, width, height)
}

/// Frame a default view centred on a point, for parcels not drawn yet.
///
/// Uses `default_span` on both axes before aspect correction.
pub fn frame_bbox_at(
    center_lon: f64,
    center_lat: f64,
    width: usize,
    height: usize,
    params: &FramingParams,
) -> Result<BoundingBox> {
    params.validate()?;
    fit_aspect(
        center_lon,
        center_lat,
        params.default_span,
        params.default_span,
        width,
        height,
    )
}

fn fit_aspect(
    center_lon: f64,
    center_lat: f64,
    mut lon_span: f64,
    mut lat_span: f64,
    width: usize,
    height: usize,
) -> Result<BoundingBox> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    let target = width as f64 / height as f64;

    if lon_span / lat_span < target {
        // too tall: widen
        lon_span = lat_span * target;
    } else {
        // too wide: heighten
        lat_span = lon_span / target;
    }

    BoundingBox::from_center(center_lon, center_lat, lon_span, lat_span)
}
