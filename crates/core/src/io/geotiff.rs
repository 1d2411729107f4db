//! GeoTIFF band reading/writing via the `tiff` crate
//!
//! Only what the vegetation workflow needs: single-band rasters on a
//! north-up lon/lat grid (ModelPixelScale + ModelTiepoint tags).

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;

/// Read the first band of a GeoTIFF file into a Raster.
///
/// A file without ModelPixelScale/ModelTiepoint tags keeps the default
/// pixel-unit transform; use [`read_geotiff_georeferenced`] when the band
/// must be placed on the map.
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(BufReader::new(file)).map(|(raster, _)| raster)
}

/// Read the first band of a GeoTIFF file that must carry a lon/lat georeference
///
/// # Errors
/// `MissingGeoreference` when the pixel-scale or tiepoint tag is absent.
pub fn read_geotiff_georeferenced<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    require_georeference(decode_geotiff(BufReader::new(file))?)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T: RasterElement>(data: &[u8]) -> Result<Raster<T>> {
    decode_geotiff(Cursor::new(data)).map(|(raster, _)| raster)
}

fn require_georeference<T: RasterElement>((raster, georeferenced): (Raster<T>, bool)) -> Result<Raster<T>> {
    if georeferenced {
        Ok(raster)
    } else {
        Err(Error::MissingGeoreference)
    }
}

fn cast_all<S, T>(buf: Vec<S>) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.into_iter()
        .map(|v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

/// Decode the first band; the flag tells whether georeference tags were found
fn decode_geotiff<T, R>(reader: R) -> Result<(Raster<T>, bool)>
where
    T: RasterElement,
    R: Read + Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;
    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let data: Vec<T> = match result {
        DecodingResult::F32(buf) => cast_all(buf),
        DecodingResult::F64(buf) => cast_all(buf),
        DecodingResult::U8(buf) => cast_all(buf),
        DecodingResult::U16(buf) => cast_all(buf),
        DecodingResult::U32(buf) => cast_all(buf),
        DecodingResult::I16(buf) => cast_all(buf),
        DecodingResult::I32(buf) => cast_all(buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    // Multi-sample TIFFs decode interleaved; only single-band rasters are accepted
    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;
    let transform = read_geotransform(&mut decoder);
    let georeferenced = transform.is_some();
    if let Some(transform) = transform {
        raster.set_transform(transform);
    }

    Ok((raster, georeferenced))
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))
        .ok()?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT)).ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
    Some(GeoTransform::new(
        tiepoint[3] - tiepoint[0] * scale[0],
        tiepoint[4] + tiepoint[1] * scale[1],
        scale[0],
        -scale[1],
    ))
}

/// Write a Raster to a single-band 32-bit float GeoTIFF file
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, file)
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T: RasterElement>(raster: &Raster<T>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf))?;
    Ok(buf)
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();
    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();
    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    // GTModelType = Geographic, GTRasterType = PixelIsArea, GeographicType = WGS84
    let geokeys: [u16; 16] = [
        1, 1, 0, 3,
        1024, 0, 1, 2,
        1025, 0, 1, 1,
        2048, 0, 1, 4326,
    ];

    let tag_err = |e: tiff::TiffError| Error::Other(format!("Cannot write GeoTIFF tag: {}", e));
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), &scale[..])
        .map_err(tag_err)?;
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT), &tiepoint[..])
        .map_err(tag_err)?;
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY), &geokeys[..])
        .map_err(tag_err)?;

    image
        .write_data(&data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_band_roundtrip_keeps_values_and_transform() {
        let mut band: Raster<f64> = Raster::new(3, 4);
        for row in 0..3 {
            for col in 0..4 {
                band.set(row, col, (row * 4 + col) as f64 / 10.0).unwrap();
            }
        }
        band.set_transform(GeoTransform::new(77.0, 13.0, 0.001, -0.001));

        let bytes = write_geotiff_to_buffer(&band).unwrap();
        let back: Raster<f64> = read_geotiff_from_buffer(&bytes).unwrap();

        assert_eq!(back.shape(), (3, 4));
        assert_relative_eq!(back.get(2, 3).unwrap(), 1.1, epsilon = 1e-6);
        assert_relative_eq!(back.transform().origin_x, 77.0, epsilon = 1e-9);
        assert_relative_eq!(back.transform().pixel_height, -0.001, epsilon = 1e-12);
    }

    #[test]
    fn test_untagged_tiff_has_no_georeference() {
        let mut buf = Vec::new();
        TiffEncoder::new(Cursor::new(&mut buf))
            .unwrap()
            .write_image::<Gray32Float>(2, 2, &[0.1f32, 0.2, 0.3, 0.4])
            .unwrap();

        let (band, georeferenced) = decode_geotiff::<f64, _>(Cursor::new(&buf)).unwrap();
        assert!(!georeferenced);
        assert_eq!(band.shape(), (2, 2));
        assert!(matches!(
            require_georeference(decode_geotiff::<f64, _>(Cursor::new(&buf)).unwrap()),
            Err(Error::MissingGeoreference)
        ));

        let tagged = write_geotiff_to_buffer(&band).unwrap();
        assert!(decode_geotiff::<f64, _>(Cursor::new(&tagged)).unwrap().1);
    }

    #[test]
    fn test_georeferenced_file_read() {
        let mut band: Raster<f64> = Raster::filled(2, 3, 0.5);
        band.set_transform(GeoTransform::new(10.0, 46.0, 0.01, -0.01));
        let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();
        write_geotiff(&band, tmp.path()).unwrap();

        let back: Raster<f64> = read_geotiff_georeferenced(tmp.path()).unwrap();
        assert_relative_eq!(back.transform().origin_y, 46.0, epsilon = 1e-9);
    }

    #[test]
    fn test_file_roundtrip() {
        let band: Raster<f64> = Raster::filled(2, 2, 0.25);
        let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();
        write_geotiff(&band, tmp.path()).unwrap();

        let back: Raster<f64> = read_geotiff(tmp.path()).unwrap();
        assert_relative_eq!(back.get(1, 1).unwrap(), 0.25, epsilon = 1e-6);
    }
}
