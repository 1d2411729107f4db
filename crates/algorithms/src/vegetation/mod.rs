//! Vegetation health estimation for a parcel
//!
//! - classify: index colour -> health class
//! - aggregate: class counts -> [`VegetationStats`]
//! - analyze: ring + image -> statistics, end to end

mod aggregate;
mod analyze;
mod classify;

pub use aggregate::{summarize, BucketCounts, CoverageRule, VegetationStats};
pub use analyze::{
    analyze_region, analyze_region_with, count_buckets, AnalysisParams, RegionAnalysis,
    RegionInput,
};
pub use classify::{classify_image, classify_rgb, classify_sample, HealthBucket};
