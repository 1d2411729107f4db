//! Parcel boundary rings

use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Ordered boundary vertices of a parcel, `x` = longitude, `y` = latitude.
///
/// The ring is closed implicitly: the last vertex connects back to the
/// first. A repeated closing vertex is dropped on construction. On the wire
/// a ring is the `[[lon, lat], ...]` array emitted by map drawing widgets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct PolygonRing {
    vertices: Vec<Coord<f64>>,
}

impl PolygonRing {
    pub fn new(mut vertices: Vec<Coord<f64>>) -> Self {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Self { vertices }
    }

    /// Build a ring from `(lon, lat)` pairs
    pub fn from_lon_lat<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(points.into_iter().map(|(x, y)| Coord { x, y }).collect())
    }

    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(|c| c.x.is_finite() && c.y.is_finite())
    }

    /// Whether the ring encloses an area worth rasterizing: at least three
    /// vertices, all finite
    pub fn is_region(&self) -> bool {
        self.vertices.len() >= 3 && self.is_finite()
    }

    /// Raw extent as `(min_lon, max_lon, min_lat, max_lat)`.
    ///
    /// `None` for an empty ring or one with non-finite coordinates. A single
    /// point yields a zero-sized extent.
    pub fn extent(&self) -> Option<(f64, f64, f64, f64)> {
        if self.vertices.is_empty() || !self.is_finite() {
            return None;
        }
        let first = self.vertices[0];
        let init = (first.x, first.x, first.y, first.y);
        Some(self.vertices.iter().fold(init, |(x0, x1, y0, y1), c| {
            (x0.min(c.x), x1.max(c.x), y0.min(c.y), y1.max(c.y))
        }))
    }

    /// Edges including the implicit closing edge from the last vertex to the first
    pub fn edges(&self) -> impl Iterator<Item = (Coord<f64>, Coord<f64>)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl From<Vec<[f64; 2]>> for PolygonRing {
    fn from(points: Vec<[f64; 2]>) -> Self {
        Self::from_lon_lat(points.into_iter().map(|[x, y]| (x, y)))
    }
}

impl From<PolygonRing> for Vec<[f64; 2]> {
    fn from(ring: PolygonRing) -> Self {
        ring.vertices.into_iter().map(|c| [c.x, c.y]).collect()
    }
}

impl From<LineString<f64>> for PolygonRing {
    fn from(ls: LineString<f64>) -> Self {
        Self::new(ls.0)
    }
}

impl From<&Polygon<f64>> for PolygonRing {
    /// Uses the exterior ring; holes are ignored
    fn from(poly: &Polygon<f64>) -> Self {
        Self::new(poly.exterior().0.clone())
    }
}
