//! Reduction of classified pixels into parcel statistics

use super::classify::HealthBucket;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

/// Number of in-parcel pixels per health class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts {
    pub healthy: usize,
    pub moderate: usize,
    pub sparse: usize,
    pub barren: usize,
}

impl BucketCounts {
    pub fn record(&mut self, bucket: HealthBucket) {
        match bucket {
            HealthBucket::Healthy => self.healthy += 1,
            HealthBucket::Moderate => self.moderate += 1,
            HealthBucket::Sparse => self.sparse += 1,
            HealthBucket::Barren => self.barren += 1,
        }
    }

    pub fn get(&self, bucket: HealthBucket) -> usize {
        match bucket {
            HealthBucket::Healthy => self.healthy,
            HealthBucket::Moderate => self.moderate,
            HealthBucket::Sparse => self.sparse,
            HealthBucket::Barren => self.barren,
        }
    }

    /// Total pixel count N
    pub fn total(&self) -> usize {
        self.healthy + self.moderate + self.sparse + self.barren
    }

    /// Sum of per-pixel index values.
    ///
    /// Derived from the counts, so it does not depend on the order pixels
    /// were visited in.
    pub fn index_sum(&self) -> f64 {
        HealthBucket::ALL
            .iter()
            .map(|&b| self.get(b) as f64 * b.index_value())
            .sum()
    }
}

impl Add for BucketCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            healthy: self.healthy + rhs.healthy,
            moderate: self.moderate + rhs.moderate,
            sparse: self.sparse + rhs.sparse,
            barren: self.barren + rhs.barren,
        }
    }
}

impl Sum for BucketCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// How the coverage score is derived from the healthy and moderate shares.
///
/// The two rules can differ by one point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageRule {
    /// `round((healthy + moderate) / N * 100)`
    #[default]
    SumThenRound,
    /// `round(healthy / N * 100) + round(moderate / N * 100)`
    RoundThenSum,
}

/// Vegetation summary of one parcel.
///
/// Percentages are rounded independently and are not renormalised, so
/// the four class shares may add up to anything from 99 to 101.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetationStats {
    /// Mean index value, rounded to two decimals
    pub mean: f64,
    pub healthy: u8,
    pub moderate: u8,
    pub sparse: u8,
    pub barren: u8,
    /// Share of healthy plus moderate pixels
    pub coverage_score: u8,
    /// In-parcel pixel count N the shares are based on
    pub pixel_count: usize,
}

impl VegetationStats {
    pub fn share(&self, bucket: HealthBucket) -> u8 {
        match bucket {
            HealthBucket::Healthy => self.healthy,
            HealthBucket::Moderate => self.moderate,
            HealthBucket::Sparse => self.sparse,
            HealthBucket::Barren => self.barren,
        }
    }
}

/// Summarise class counts.
///
/// Returns `None` when there are no pixels: the parcel has not been
/// analysed, which is not an error.
///
/// Rounding is half away from zero (all values are non-negative, so this is
/// round-half-up).
pub fn summarize(counts: &BucketCounts, rule: CoverageRule) -> Option<VegetationStats> {
    let n = counts.total();
    if n == 0 {
        return None;
    }

    let mean = (counts.index_sum() / n as f64 * 100.0).round() / 100.0;
    let healthy = percent(counts.healthy, n);
    let moderate = percent(counts.moderate, n);
    let coverage_score = match rule {
        CoverageRule::SumThenRound => percent(counts.healthy + counts.moderate, n),
        CoverageRule::RoundThenSum => healthy.saturating_add(moderate),
    };

    Some(VegetationStats {
        mean,
        healthy,
        moderate,
        sparse: percent(counts.sparse, n),
        barren: percent(counts.barren, n),
        coverage_score,
        pixel_count: n,
    })
}

fn percent(count: usize, total: usize) -> u8 {
    (count as f64 / total as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn counts(healthy: usize, moderate: usize, sparse: usize, barren: usize) -> BucketCounts {
        BucketCounts {
            healthy,
            moderate,
            sparse,
            barren,
        }
    }

    #[test]
    fn test_no_pixels_no_stats() {
        assert_eq!(summarize(&BucketCounts::default(), CoverageRule::default()), None);
    }

    #[test]
    fn test_all_healthy() {
        let stats = summarize(&counts(120_000, 0, 0, 0), CoverageRule::default()).unwrap();
        assert_relative_eq!(stats.mean, 0.70);
        assert_eq!(
            (stats.healthy, stats.moderate, stats.sparse, stats.barren),
            (100, 0, 0, 0)
        );
        assert_eq!(stats.coverage_score, 100);
        assert_eq!(stats.pixel_count, 120_000);
    }

    #[test]
    fn test_mixed_classes() {
        let stats = summarize(&counts(30, 20, 10, 40), CoverageRule::default()).unwrap();
        // (30*0.7 + 20*0.5 + 10*0.3 + 40*0.1) / 100
        assert_relative_eq!(stats.mean, 0.38);
        assert_eq!(
            (stats.healthy, stats.moderate, stats.sparse, stats.barren),
            (30, 20, 10, 40)
        );
        assert_eq!(stats.coverage_score, 50);
    }

    #[test]
    fn test_shares_may_not_sum_to_one_hundred() {
        // 1/3 each -> 33 + 33 + 33
        let stats = summarize(&counts(1, 1, 1, 0), CoverageRule::default()).unwrap();
        let total: u32 = HealthBucket::ALL.iter().map(|&b| stats.share(b) as u32).sum();
        assert_eq!(total, 99);
        assert_eq!(stats.coverage_score, 67);
    }

    #[test]
    fn test_coverage_rules_can_differ() {
        // 1/8 = 12.5% rounds up to 13 on its own
        let c = counts(1, 1, 0, 6);
        let summed = summarize(&c, CoverageRule::SumThenRound).unwrap();
        let rounded = summarize(&c, CoverageRule::RoundThenSum).unwrap();

        assert_eq!(summed.healthy, 13);
        assert_eq!(summed.moderate, 13);
        assert_eq!(summed.coverage_score, 25);
        assert_eq!(rounded.coverage_score, 26);
    }

    #[test]
    fn test_counts_add_up() {
        let total: BucketCounts = vec![counts(1, 2, 3, 4), counts(10, 0, 0, 1)].into_iter().sum();
        assert_eq!(total, counts(11, 2, 3, 5));
        assert_eq!(total.total(), 21);
    }

    #[test]
    fn test_stats_json_is_camel_case() {
        let stats = summarize(&counts(1, 0, 0, 1), CoverageRule::default()).unwrap();
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["coverageScore"], 50);
        assert_eq!(json["pixelCount"], 2);
        assert_eq!(json["mean"], 0.4);
    }
}
