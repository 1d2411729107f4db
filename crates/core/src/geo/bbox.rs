//! Axis-aligned geographic bounding box

use crate::error::{Error, Result};
use geo_types::{LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in lon/lat degrees.
///
/// Always finite with `min_lon < max_lon` and `min_lat < max_lat`; the
/// constructors reject anything else. Serialized with the camelCase keys
/// used by web map clients (`minLon`, `maxLon`, `minLat`, `maxLat`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct BoundingBox {
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBounds {
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
}

impl BoundingBox {
    /// Create a bounding box, validating its extent
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Result<Self> {
        let finite = [min_lon, max_lon, min_lat, max_lat]
            .iter()
            .all(|v| v.is_finite());
        if !finite || min_lon >= max_lon || min_lat >= max_lat {
            return Err(Error::InvalidBoundingBox {
                min_lon,
                max_lon,
                min_lat,
                max_lat,
            });
        }
        Ok(Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        })
    }

    /// Create a box of the given spans centred on (`center_lon`, `center_lat`)
    pub fn from_center(center_lon: f64, center_lat: f64, lon_span: f64, lat_span: f64) -> Result<Self> {
        Self::new(
            center_lon - lon_span / 2.0,
            center_lon + lon_span / 2.0,
            center_lat - lat_span / 2.0,
            center_lat + lat_span / 2.0,
        )
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Centre as (lon, lat)
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Ratio `lon_span / lat_span`
    pub fn aspect_ratio(&self) -> f64 {
        self.lon_span() / self.lat_span()
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// The box as a closed polygon, counter-clockwise from the south-west corner
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (self.min_lon, self.min_lat),
                (self.max_lon, self.min_lat),
                (self.max_lon, self.max_lat),
                (self.min_lon, self.max_lat),
                (self.min_lon, self.min_lat),
            ]),
            vec![],
        )
    }
}

impl TryFrom<RawBounds> for BoundingBox {
    type Error = Error;

    fn try_from(raw: RawBounds) -> Result<Self> {
        Self::new(raw.min_lon, raw.max_lon, raw.min_lat, raw.max_lat)
    }
}

impl From<BoundingBox> for RawBounds {
    fn from(b: BoundingBox) -> Self {
        Self {
            min_lon: b.min_lon,
            max_lon: b.max_lon,
            min_lat: b.min_lat,
            max_lat: b.max_lat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_inverted_and_non_finite_extents() {
        assert!(BoundingBox::new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(BoundingBox::new(0.0, 1.0, 1.0, 1.0).is_err());
        assert!(BoundingBox::new(f64::NAN, 1.0, 0.0, 1.0).is_err());
        assert!(BoundingBox::new(0.0, f64::INFINITY, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_from_center_spans() {
        let b = BoundingBox::from_center(77.5, 12.9, 0.04, 0.03).unwrap();
        assert_relative_eq!(b.lon_span(), 0.04, epsilon = 1e-12);
        assert_relative_eq!(b.lat_span(), 0.03, epsilon = 1e-12);
        let (lon, lat) = b.center();
        assert_relative_eq!(lon, 77.5, epsilon = 1e-12);
        assert_relative_eq!(lat, 12.9, epsilon = 1e-12);
    }

    #[test]
    fn test_json_uses_camel_case_and_validates() {
        let b = BoundingBox::new(1.0, 2.0, 3.0, 4.0).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("\"minLon\":1.0"));

        let back: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);

        let bad = r#"{"minLon":2.0,"maxLon":1.0,"minLat":0.0,"maxLat":1.0}"#;
        assert!(serde_json::from_str::<BoundingBox>(bad).is_err());
    }
}
