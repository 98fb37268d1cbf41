//! Solid and vertical-gradient fills

use image::{Rgb, RgbImage};

/// Vertical linear gradient, `top` at row 0
///
/// Each row uses `ratio = row / height` and truncates channels toward zero,
/// so the last row lands within one step of `bottom`.
#[must_use]
pub fn vertical_gradient(width: u32, height: u32, top: Rgb<u8>, bottom: Rgb<u8>) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    for (row, pixels) in image.enumerate_rows_mut() {
        let color = interpolate(top, bottom, f64::from(row) / f64::from(height));
        for (_, _, pixel) in pixels {
            *pixel = color;
        }
    }
    image
}

/// Single-color fill
#[must_use]
pub fn solid(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

fn interpolate(from: Rgb<u8>, to: Rgb<u8>, ratio: f64) -> Rgb<u8> {
    let channel = |a: u8, b: u8| (f64::from(a) * (1.0 - ratio) + f64::from(b) * ratio) as u8;
    Rgb([
        channel(from[0], to[0]),
        channel(from[1], to[1]),
        channel(from[2], to[2]),
    ])
}
