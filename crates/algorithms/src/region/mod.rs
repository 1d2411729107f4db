//! Parcel regions on a canvas
//!
//! - Framing: padded, aspect-corrected bounding box around a parcel ring
//! - Rasterize: even-odd fill of the ring into a pixel mask

mod framing;
mod rasterize;

pub use framing::{frame_bbox, frame_bbox_at, FramingParams};
pub use rasterize::{project_ring, rasterize_ring};
