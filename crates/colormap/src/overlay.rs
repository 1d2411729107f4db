//! Parcel outline overlay.

use crate::palette::Rgb;
use canopy_core::raster::RasterImage;

/// Colour of the parcel border (#ef4444)
pub const OUTLINE_COLOR: Rgb = Rgb::new(0xef, 0x44, 0x44);

/// Width of the parcel border in pixels
pub const OUTLINE_WIDTH: f64 = 3.0;

/// Stroke a closed pixel-space path onto an image.
///
/// A pixel is painted when its centre lies within `line_width / 2` of any
/// edge, including the closing edge back to the first vertex. Paths with
/// fewer than two points or non-finite coordinates draw nothing; parts
/// outside the image are clipped.
pub fn draw_outline(image: &mut RasterImage, path: &[(f64, f64)], color: Rgb, line_width: f64) {
    if path.len() < 2 || !line_width.is_finite() || line_width <= 0.0 {
        return;
    }
    if path.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return;
    }

    let (width, height) = image.dimensions();
    let half = line_width / 2.0;
    let rgba = color.to_rgba(255);

    for i in 0..path.len() {
        let a = path[i];
        let b = path[(i + 1) % path.len()];

        let x0 = pixel_floor(a.0.min(b.0) - half, width);
        let x1 = pixel_ceil(a.0.max(b.0) + half, width);
        let y0 = pixel_floor(a.1.min(b.1) - half, height);
        let y1 = pixel_ceil(a.1.max(b.1) + half, height);

        for y in y0..y1 {
            for x in x0..x1 {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(p, a, b) <= half && image.set_pixel(x, y, rgba).is_err() {
                    return;
                }
            }
        }
    }
}

fn pixel_floor(v: f64, limit: usize) -> usize {
    v.floor().clamp(0.0, limit as f64) as usize
}

fn pixel_ceil(v: f64, limit: usize) -> usize {
    v.ceil().clamp(0.0, limit as f64) as usize
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}
