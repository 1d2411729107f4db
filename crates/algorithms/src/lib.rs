//! # Canopy Algorithms
//!
//! Parcel vegetation analysis for Canopy.
//!
//! ## Algorithm Categories
//!
//! - **region**: Framing a parcel and rasterizing its ring onto a canvas
//! - **vegetation**: Pixel classification and parcel statistics
//! - **imagery**: NDVI from near-infrared and red bands

pub mod imagery;
pub mod region;
pub mod vegetation;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{ndvi, normalized_difference};
    pub use crate::region::{frame_bbox, frame_bbox_at, project_ring, rasterize_ring, FramingParams};
    pub use crate::vegetation::{
        analyze_region, analyze_region_with, classify_image, classify_rgb, classify_sample,
        count_buckets, summarize, AnalysisParams, BucketCounts, CoverageRule, HealthBucket,
        RegionAnalysis, RegionInput, VegetationStats,
    };
    pub use canopy_core::prelude::*;
}
