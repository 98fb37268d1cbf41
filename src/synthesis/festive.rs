//! Festive: a gradient dusted with soft white sparkles

use super::gradient::vertical_gradient;
use crate::composite::overlay_rgba;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_ellipse_mut;
use rand::Rng;

pub const SPARKLE_COUNT: usize = 50;
pub const SPARKLE_MIN: u32 = 3;
pub const SPARKLE_MAX: u32 = 8;
pub const SPARKLE_ALPHA: u8 = 150;
pub const SPARKLE_BLUR: f32 = 2.0;

pub fn festive<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    top: Rgb<u8>,
    bottom: Rgb<u8>,
    rng: &mut R,
) -> RgbImage {
    let mut image = vertical_gradient(width, height, top, bottom);
    if width == 0 || height == 0 {
        return image;
    }

    let layer = sparkle_layer(width, height, rng);
    overlay_rgba(&mut image, &layer, 0, 0);
    image
}

/// Transparent layer holding blurred sparkles
///
/// The clear color is white so blurring only spreads alpha, never darkens.
fn sparkle_layer<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> RgbaImage {
    let mut layer = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 0]));
    for _ in 0..SPARKLE_COUNT {
        let x = rng.random_range(0..width) as i32;
        let y = rng.random_range(0..height) as i32;
        let size = rng.random_range(SPARKLE_MIN..=SPARKLE_MAX) as i32;
        let radius = size / 2;
        draw_filled_ellipse_mut(
            &mut layer,
            (x, y),
            radius,
            radius,
            Rgba([255, 255, 255, SPARKLE_ALPHA]),
        );
    }
    image::imageops::blur(&layer, SPARKLE_BLUR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_sparkles_only_brighten() {
        let top = Rgb([20, 10, 40]);
        let bottom = Rgb([40, 10, 20]);
        let plain = vertical_gradient(120, 80, top, bottom);
        let img = festive(120, 80, top, bottom, &mut StdRng::seed_from_u64(1));

        assert_eq!(img.dimensions(), plain.dimensions());
        let mut brighter = 0;
        for (a, b) in img.pixels().zip(plain.pixels()) {
            assert!(a[0] >= b[0] && a[1] >= b[1] && a[2] >= b[2]);
            if a != b {
                brighter += 1;
            }
        }
        assert!(brighter > 0);
    }

    #[test]
    fn test_sparkle_layer_is_white() {
        let layer = sparkle_layer(64, 64, &mut StdRng::seed_from_u64(2));
        assert!(layer.pixels().all(|p| p[0] >= 250 && p[1] >= 250 && p[2] >= 250));
        assert!(layer.pixels().all(|p| p[3] <= SPARKLE_ALPHA));
        assert!(layer.pixels().any(|p| p[3] > 0));
    }
}
