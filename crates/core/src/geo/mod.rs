//! Geographic framing of a parcel: bounding boxes and boundary rings
//!
//! Coordinates are WGS84 longitude/latitude in degrees, in that order.

mod bbox;
mod ring;

pub use bbox::BoundingBox;
pub use ring::PolygonRing;
