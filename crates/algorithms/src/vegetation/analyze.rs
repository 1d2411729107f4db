//! Parcel analysis: rasterize, classify, aggregate

use super::aggregate::{summarize, BucketCounts, CoverageRule, VegetationStats};
use super::classify::classify_sample;
use crate::maybe_rayon::*;
use crate::region::{frame_bbox, frame_bbox_at, rasterize_ring, FramingParams};
use canopy_core::geo::{BoundingBox, PolygonRing};
use canopy_core::raster::{PixelMask, RasterImage, CHANNELS};
use canopy_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for a parcel analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Canvas width in pixels the imagery is rendered at (default 400)
    pub canvas_width: usize,
    /// Canvas height in pixels (default 300)
    pub canvas_height: usize,
    pub framing: FramingParams,
    pub coverage_rule: CoverageRule,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            canvas_width: 400,
            canvas_height: 300,
            framing: FramingParams::default(),
            coverage_rule: CoverageRule::default(),
        }
    }
}

impl AnalysisParams {
    pub fn with_canvas(mut self, width: usize, height: usize) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        self.framing.validate()
    }

    /// Frame a ring for this canvas
    pub fn frame(&self, ring: &PolygonRing) -> Result<BoundingBox> {
        frame_bbox(ring, self.canvas_width, self.canvas_height, &self.framing)
    }

    /// Frame the default view around a point for this canvas
    pub fn frame_at(&self, center_lon: f64, center_lat: f64) -> Result<BoundingBox> {
        frame_bbox_at(
            center_lon,
            center_lat,
            self.canvas_width,
            self.canvas_height,
            &self.framing,
        )
    }
}

/// Count the health classes of every in-mask pixel.
///
/// Rows are counted independently and summed in row order, so the result
/// is the same with or without the `parallel` feature.
pub fn count_buckets(image: &RasterImage, mask: &PixelMask) -> Result<BucketCounts> {
    let (width, height) = image.dimensions();
    if (mask.width(), mask.height()) != (width, height) {
        return Err(Error::SizeMismatch {
            er: height,
            ec: width,
            ar: mask.height(),
            ac: mask.width(),
        });
    }

    let per_row: Vec<BucketCounts> = (0..height)
        .into_par_iter()
        .map(|y| {
            let mut counts = BucketCounts::default();
            let (Some(alpha), Some(samples)) = (mask.row(y), image.row(y)) else {
                return counts;
            };
            for (a, px) in alpha.iter().zip(samples.chunks_exact(CHANNELS)) {
                if *a != 0 {
                    counts.record(classify_sample([px[0], px[1], px[2], px[3]]));
                }
            }
            counts
        })
        .collect();

    Ok(per_row.into_iter().sum())
}

/// Summarise vegetation health inside a parcel.
///
/// `image` must be the index rendering of `bbox` at `canvas_width x
/// canvas_height`. Returns `None` when there is nothing to report: fewer
/// than three ring vertices, a non-finite coordinate, an image of another
/// size, or no pixel centre inside the ring.
///
/// Uses the default coverage rule; see [`analyze_region_with`].
pub fn analyze_region(
    bbox: &BoundingBox,
    ring: &PolygonRing,
    image: &RasterImage,
    canvas_width: usize,
    canvas_height: usize,
) -> Option<VegetationStats> {
    let params = AnalysisParams::default().with_canvas(canvas_width, canvas_height);
    analyze_region_with(bbox, ring, image, &params)
}

/// [`analyze_region`] with explicit parameters
pub fn analyze_region_with(
    bbox: &BoundingBox,
    ring: &PolygonRing,
    image: &RasterImage,
    params: &AnalysisParams,
) -> Option<VegetationStats> {
    if !ring.is_region() {
        debug!(vertices = ring.len(), "ring does not describe a region");
        return None;
    }

    let canvas = (params.canvas_width, params.canvas_height);
    if image.dimensions() != canvas {
        debug!(
            image = ?image.dimensions(),
            canvas = ?canvas,
            "image does not cover the analysis canvas"
        );
        return None;
    }

    let mask = match rasterize_ring(bbox, ring, params.canvas_width, params.canvas_height) {
        Ok(mask) => mask,
        Err(e) => {
            debug!(error = %e, "rasterization failed");
            return None;
        }
    };

    let counts = count_buckets(image, &mask).ok()?;
    debug!(
        width = params.canvas_width,
        height = params.canvas_height,
        pixels = counts.total(),
        "parcel rasterized"
    );

    let stats = summarize(&counts, params.coverage_rule);
    if stats.is_none() {
        debug!("no pixel centre inside the parcel");
    }
    stats
}

/// Input of [`RegionAnalysis`]
#[derive(Debug, Clone)]
pub struct RegionInput {
    pub bbox: BoundingBox,
    pub ring: PolygonRing,
    pub image: RasterImage,
}

/// Parcel vegetation analysis
#[derive(Debug, Clone, Default)]
pub struct RegionAnalysis;

impl Algorithm for RegionAnalysis {
    type Input = RegionInput;
    type Output = Option<VegetationStats>;
    type Params = AnalysisParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "RegionAnalysis"
    }

    fn description(&self) -> &'static str {
        "Summarise vegetation health inside a parcel from a rendered index image"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        params.validate()?;
        Ok(analyze_region_with(
            &input.bbox,
            &input.ring,
            &input.image,
            &params,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vegetation::HealthBucket;
    use approx::assert_relative_eq;

    const HEALTHY: [u8; 4] = [26, 153, 26, 255];
    const BARREN: [u8; 4] = [153, 153, 153, 255];

    fn bbox() -> BoundingBox {
        BoundingBox::new(0.0, 4.0, 0.0, 3.0).unwrap()
    }

    fn square() -> PolygonRing {
        PolygonRing::from_lon_lat([(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)])
    }

    #[test]
    fn test_all_healthy_parcel() {
        let image = RasterImage::filled(400, 300, HEALTHY);
        let stats = analyze_region(&bbox(), &square(), &image, 400, 300).unwrap();

        assert_eq!(stats.pixel_count, 120_000);
        assert_eq!(stats.healthy, 100);
        assert_eq!(stats.coverage_score, 100);
        assert_relative_eq!(stats.mean, 0.70);
    }

    #[test]
    fn test_only_pixels_inside_the_ring_count() {
        // Healthy west half, barren east half; the ring covers the east half
        let mut image = RasterImage::filled(400, 300, HEALTHY);
        image.fill_rect(200, 0, 400, 300, BARREN);
        let ring = PolygonRing::from_lon_lat([(2.0, 0.0), (4.0, 0.0), (4.0, 3.0), (2.0, 3.0)]);

        let stats = analyze_region(&bbox(), &ring, &image, 400, 300).unwrap();
        assert_eq!(stats.pixel_count, 200 * 300);
        assert_eq!(stats.barren, 100);
        assert_eq!(stats.healthy, 0);
        assert_eq!(stats.coverage_score, 0);
        assert_relative_eq!(stats.mean, 0.10);
    }

    #[test]
    fn test_image_alpha_does_not_matter() {
        let image = RasterImage::filled(40, 30, [26, 153, 26, 0]);
        let stats = analyze_region(&bbox(), &square(), &image, 40, 30).unwrap();
        assert_eq!(stats.healthy, 100);
    }

    #[test]
    fn test_fewer_than_three_points_gives_nothing() {
        let image = RasterImage::filled(400, 300, HEALTHY);
        let ring = PolygonRing::from_lon_lat([(0.0, 0.0), (4.0, 3.0)]);
        assert_eq!(analyze_region(&bbox(), &ring, &image, 400, 300), None);
    }

    #[test]
    fn test_non_finite_ring_gives_nothing() {
        let image = RasterImage::filled(400, 300, HEALTHY);
        let ring = PolygonRing::from_lon_lat([(0.0, 0.0), (f64::NAN, 0.0), (4.0, 3.0)]);
        assert_eq!(analyze_region(&bbox(), &ring, &image, 400, 300), None);
    }

    #[test]
    fn test_ring_outside_the_canvas_gives_nothing() {
        let image = RasterImage::filled(400, 300, HEALTHY);
        let ring = PolygonRing::from_lon_lat([(10.0, 10.0), (11.0, 10.0), (11.0, 11.0)]);
        assert_eq!(analyze_region(&bbox(), &ring, &image, 400, 300), None);
    }

    #[test]
    fn test_image_of_another_size_gives_nothing() {
        let image = RasterImage::filled(200, 150, HEALTHY);
        assert_eq!(analyze_region(&bbox(), &square(), &image, 400, 300), None);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let mut image = RasterImage::filled(400, 300, HEALTHY);
        image.fill_rect(0, 100, 400, 180, [230, 230, 102, 255]);
        image.fill_rect(300, 0, 400, 300, BARREN);
        let ring = PolygonRing::from_lon_lat([(0.3, 0.2), (3.7, 0.5), (2.0, 2.9)]);

        let first = analyze_region(&bbox(), &ring, &image, 400, 300);
        let second = analyze_region(&bbox(), &ring, &image, 400, 300);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_row_counts_match_a_plain_pixel_tally() {
        // Diagonal stripes of all four classes under a concave ring
        let palette = [HEALTHY, [127, 204, 51, 255], [229, 229, 102, 255], BARREN];
        let mut image = RasterImage::filled(97, 61, BARREN);
        for y in 0..61 {
            for x in 0..97 {
                image.set_pixel(x, y, palette[(x + 2 * y) / 7 % 4]).unwrap();
            }
        }
        let ring = PolygonRing::from_lon_lat([
            (0.1, 0.1),
            (3.9, 0.3),
            (3.5, 2.9),
            (2.0, 1.2),
            (0.4, 2.7),
        ]);
        let mask = rasterize_ring(&bbox(), &ring, 97, 61).unwrap();

        let mut expected = BucketCounts::default();
        for (i, px) in image.pixels().enumerate() {
            if mask.contains(i % 97, i / 97) {
                expected.record(classify_sample(px));
            }
        }

        let counted = count_buckets(&image, &mask).unwrap();
        assert_eq!(counted, expected);
        assert!(HealthBucket::ALL.iter().all(|&b| counted.get(b) > 0));
    }

    #[test]
    fn test_tiny_bbox_is_still_analysed() {
        let bbox = BoundingBox::new(0.0, 1e-13, 0.0, 0.75e-13).unwrap();
        let ring = PolygonRing::from_lon_lat([(0.0, 0.0), (1e-13, 0.0), (1e-13, 0.75e-13), (0.0, 0.75e-13)]);
        let image = RasterImage::filled(400, 300, HEALTHY);

        let stats = analyze_region(&bbox, &ring, &image, 400, 300).unwrap();
        assert_eq!(stats.healthy, 100);
        assert_eq!(stats.pixel_count, 120_000);
    }

    #[test]
    fn test_counting_rejects_mismatched_mask() {
        let image = RasterImage::filled(4, 3, HEALTHY);
        let mask = PixelMask::empty(3, 4);
        assert!(count_buckets(&image, &mask).is_err());
    }

    #[test]
    fn test_algorithm_trait_validates_params() {
        let input = RegionInput {
            bbox: bbox(),
            ring: square(),
            image: RasterImage::filled(40, 30, HEALTHY),
        };
        let params = AnalysisParams::default().with_canvas(40, 30);
        let stats = RegionAnalysis.execute(input.clone(), params).unwrap().unwrap();
        assert_eq!(stats.pixel_count, 1200);

        let bad = AnalysisParams::default().with_canvas(0, 30);
        assert!(RegionAnalysis.execute(input, bad).is_err());
    }

    #[test]
    fn test_params_from_partial_json() {
        let params: AnalysisParams =
            serde_json::from_str(r#"{"canvas_width": 640, "coverage_rule": "round_then_sum"}"#).unwrap();
        assert_eq!(params.canvas_width, 640);
        assert_eq!(params.canvas_height, 300);
        assert_eq!(params.coverage_rule, CoverageRule::RoundThenSum);
        assert_eq!(params.framing, FramingParams::default());
    }
}
