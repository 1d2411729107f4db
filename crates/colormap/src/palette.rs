//! Class palette for rendered vegetation indices.

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Quantize unit-range channels to bytes.
    ///
    /// Channels are truncated, not rounded: `0.5` becomes `127`. Rounding
    /// would lift the moderate green's red channel past one half and the
    /// colour would read back as sparse.
    pub fn from_unit(rgb: [f64; 3]) -> Self {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Self::new(q(rgb[0]), q(rgb[1]), q(rgb[2]))
    }

    pub const fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

/// Stepped NDVI palette with four classes.
///
/// A value `v` falls in the first class whose break exceeds it; values at
/// or above the last break take the last colour.
#[derive(Debug, Clone, PartialEq)]
pub struct VegetationPalette {
    /// Ascending class breaks
    pub breaks: [f64; 3],
    /// Unit-range colours, lowest class first
    pub colors: [[f64; 3]; 4],
}

impl Default for VegetationPalette {
    fn default() -> Self {
        Self {
            breaks: [0.2, 0.4, 0.6],
            colors: [
                [0.6, 0.6, 0.6], // bare soil
                [0.9, 0.9, 0.4], // sparse
                [0.5, 0.8, 0.2], // moderate
                [0.1, 0.6, 0.1], // healthy
            ],
        }
    }
}

impl VegetationPalette {
    /// Class index of a value, `None` for NaN
    pub fn class_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        Some(
            self.breaks
                .iter()
                .position(|&b| value < b)
                .unwrap_or(self.breaks.len()),
        )
    }

    /// Byte colour of a value, `None` for NaN
    pub fn evaluate(&self, value: f64) -> Option<Rgb> {
        self.class_of(value).map(|i| Rgb::from_unit(self.colors[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaks_are_lower_inclusive() {
        let p = VegetationPalette::default();
        assert_eq!(p.class_of(-0.5), Some(0));
        assert_eq!(p.class_of(0.1999), Some(0));
        assert_eq!(p.class_of(0.2), Some(1));
        assert_eq!(p.class_of(0.4), Some(2));
        assert_eq!(p.class_of(0.6), Some(3));
        assert_eq!(p.class_of(1.0), Some(3));
        assert_eq!(p.class_of(f64::NAN), None);
    }

    #[test]
    fn test_quantization_truncates() {
        let p = VegetationPalette::default();
        assert_eq!(p.evaluate(0.0), Some(Rgb::new(153, 153, 153)));
        assert_eq!(p.evaluate(0.3), Some(Rgb::new(229, 229, 102)));
        assert_eq!(p.evaluate(0.5), Some(Rgb::new(127, 204, 51)));
        assert_eq!(p.evaluate(0.8), Some(Rgb::new(25, 153, 25)));
    }

    #[test]
    fn test_out_of_range_channels_clamp() {
        assert_eq!(Rgb::from_unit([-1.0, 2.0, 0.0]), Rgb::new(0, 255, 0));
    }
}
