//! RGBA PNG reading/writing via the `image` crate

use crate::error::Result;
use crate::raster::RasterImage;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Read a PNG (or any format `image` can sniff) as RGBA8 samples
pub fn read_png<P: AsRef<Path>>(path: P) -> Result<RasterImage> {
    let rgba = image::open(path.as_ref())?.into_rgba8();
    from_rgba8(rgba)
}

/// Decode an in-memory PNG as RGBA8 samples
pub fn decode_png(bytes: &[u8]) -> Result<RasterImage> {
    let rgba = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_rgba8();
    from_rgba8(rgba)
}

fn from_rgba8(rgba: RgbaImage) -> Result<RasterImage> {
    let (width, height) = rgba.dimensions();
    RasterImage::from_rgba(width as usize, height as usize, rgba.into_raw())
}

fn to_rgba8(img: &RasterImage) -> RgbaImage {
    // Dimensions and buffer length are validated by RasterImage
    RgbaImage::from_raw(img.width() as u32, img.height() as u32, img.as_rgba().to_vec())
        .unwrap_or_default()
}

/// Write samples to a PNG file
pub fn write_png<P: AsRef<Path>>(img: &RasterImage, path: P) -> Result<()> {
    to_rgba8(img).save_with_format(path.as_ref(), ImageFormat::Png)?;
    Ok(())
}

/// Encode samples as an in-memory PNG
pub fn encode_png(img: &RasterImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    to_rgba8(img).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_roundtrip_is_lossless() {
        let mut img = RasterImage::filled(4, 3, [26, 153, 26, 255]);
        img.set_pixel(3, 2, [229, 229, 102, 0]).unwrap();

        let bytes = encode_png(&img).unwrap();
        let back = decode_png(&bytes).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_png_file_roundtrip() {
        let img = RasterImage::filled(2, 2, [1, 2, 3, 4]);
        let tmp = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        write_png(&img, tmp.path()).unwrap();
        assert_eq!(read_png(tmp.path()).unwrap(), img);
    }
}
