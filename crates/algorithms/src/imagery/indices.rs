//! Spectral vegetation index
//!
//! Indices operate on single-band rasters (one band per raster).

use crate::maybe_rayon::*;
use canopy_core::raster::Raster;
use canopy_core::{Error, Result};
use ndarray::Array2;

/// Compute the normalized difference between two bands:
///
/// `(band_a - band_b) / (band_a + band_b)`
///
/// Result is in the range [-1, 1] for non-negative reflectances. Pixels
/// where both bands sum to zero or either is nodata are set to NaN.
///
/// # Arguments
/// * `band_a` - Numerator positive band
/// * `band_b` - Numerator negative band
pub fn normalized_difference(band_a: &Raster<f64>, band_b: &Raster<f64>) -> Result<Raster<f64>> {
    band_a.ensure_same_shape(band_b)?;

    let (rows, cols) = band_a.shape();
    let a_data = band_a.data();
    let b_data = band_b.data();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let a = a_data[(row, col)];
                let b = b_data[(row, col)];

                if band_a.is_nodata(a) || band_b.is_nodata(b) {
                    continue;
                }

                let sum = a + b;
                if sum.abs() < 1e-10 {
                    continue; // Avoid division by zero
                }

                *out = (a - b) / sum;
            }
            row_data
        })
        .collect();

    build_output(band_a, rows, cols, data)
}

/// Normalized Difference Vegetation Index
///
/// `NDVI = (NIR - Red) / (NIR + Red)`
///
/// Values range from -1 to 1:
/// - Dense vegetation: 0.6 to 0.9
/// - Sparse vegetation: 0.2 to 0.5
/// - Bare soil: 0.1 to 0.2
/// - Water/clouds: -1.0 to 0.0
///
/// # Arguments
/// * `nir` - Near-infrared band
/// * `red` - Red band
pub fn ndvi(nir: &Raster<f64>, red: &Raster<f64>) -> Result<Raster<f64>> {
    normalized_difference(nir, red)
}

fn build_output(
    template: &Raster<f64>,
    rows: usize,
    cols: usize,
    data: Vec<f64>,
) -> Result<Raster<f64>> {
    let mut output = template.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use canopy_core::GeoTransform;

    fn make_band(rows: usize, cols: usize, value: f64) -> Raster<f64> {
        let mut r = Raster::filled(rows, cols, value);
        r.set_transform(GeoTransform::new(77.0, 13.0, 0.001, -0.001));
        r
    }

    #[test]
    fn test_ndvi_dense_vegetation() {
        let nir = make_band(5, 5, 0.8);
        let red = make_band(5, 5, 0.2);

        let result = ndvi(&nir, &red).unwrap();
        // (0.8 - 0.2) / (0.8 + 0.2) = 0.6
        assert_relative_eq!(result.get(2, 2).unwrap(), 0.6, epsilon = 1e-10);
        assert_relative_eq!(result.transform().origin_x, 77.0);
    }

    #[test]
    fn test_normalized_difference_range() {
        let mut a = make_band(4, 4, 0.0);
        let mut b = make_band(4, 4, 0.0);
        for row in 0..4 {
            for col in 0..4 {
                a.set(row, col, (row * 4 + col) as f64 * 0.05).unwrap();
                b.set(row, col, 0.4 - (row * 4 + col) as f64 * 0.02).unwrap();
            }
        }

        let result = normalized_difference(&a, &b).unwrap();
        for &v in result.data().iter() {
            assert!(v.is_nan() || (-1.0..=1.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_zero_sum_is_nodata() {
        let nir = make_band(2, 2, 0.0);
        let red = make_band(2, 2, 0.0);
        let result = ndvi(&nir, &red).unwrap();
        assert!(result.get(0, 0).unwrap().is_nan());
        assert_eq!(result.valid_count(), 0);
    }

    #[test]
    fn test_nodata_propagates() {
        let mut nir = make_band(3, 3, 0.5);
        nir.set_nodata(Some(-9999.0));
        nir.set(1, 1, -9999.0).unwrap();
        let red = make_band(3, 3, 0.1);

        let result = ndvi(&nir, &red).unwrap();
        assert!(result.get(1, 1).unwrap().is_nan());
        assert!(!result.get(0, 0).unwrap().is_nan());
    }

    #[test]
    fn test_mismatched_bands() {
        let nir = make_band(3, 3, 0.5);
        let red = make_band(3, 4, 0.1);
        assert!(ndvi(&nir, &red).is_err());
    }
}
