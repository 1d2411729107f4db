//! I/O for spectral bands (GeoTIFF) and rendered canvases (PNG)

mod geotiff;
mod png;

pub use geotiff::{
    read_geotiff, read_geotiff_from_buffer, read_geotiff_georeferenced, write_geotiff,
    write_geotiff_to_buffer,
};
pub use png::{decode_png, encode_png, read_png, write_png};
