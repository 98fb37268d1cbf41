//! Marble: random-walk veins stroked over a solid base, then blurred

use crate::{palette::luma, utils::gaussian_blur};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use rand::Rng;

/// Veins per canvas
pub const VEIN_COUNT: usize = 8;
/// Segments per vein
pub const VEIN_SEGMENTS: usize = 30;
/// Largest per-step offset on either axis
pub const VEIN_STEP: i32 = 50;
/// Final softening blur radius
pub const MARBLE_BLUR: f32 = 8.0;

/// Render a marble canvas
pub fn marble<R: Rng + ?Sized>(width: u32, height: u32, base: Rgb<u8>, rng: &mut R) -> RgbImage {
    let mut image = RgbImage::from_pixel(width, height, base);
    if width == 0 || height == 0 {
        return image;
    }

    let color = vein_color(base);
    for _ in 0..VEIN_COUNT {
        let mut x = rng.random_range(0..width) as i32;
        let mut y = rng.random_range(0..height) as i32;
        for _ in 0..VEIN_SEGMENTS {
            let next_x = x + rng.random_range(-VEIN_STEP..=VEIN_STEP);
            let next_y = y + rng.random_range(-VEIN_STEP..=VEIN_STEP);
            let stroke = rng.random_range(2..=5);
            stroke_segment(&mut image, (x, y), (next_x, next_y), stroke, color);
            x = next_x;
            y = next_y;
        }
    }

    gaussian_blur(&image, MARBLE_BLUR)
}

/// Dark bases get light veins, light bases get dark veins
#[must_use]
pub fn vein_color(base: Rgb<u8>) -> Rgb<u8> {
    if luma(base) > 128.0 {
        Rgb(base.0.map(|c| (f32::from(c) * 0.55) as u8))
    } else {
        Rgb(base.0.map(|c| c + (255 - c) / 2))
    }
}

/// Thick line by stamping discs along the segment; off-canvas parts are clipped
fn stroke_segment(
    image: &mut RgbImage,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    width: i32,
    color: Rgb<u8>,
) {
    let radius = (width / 2).max(1);
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = x0 as f32 + (x1 - x0) as f32 * t;
        let y = y0 as f32 + (y1 - y0) as f32 * t;
        draw_filled_circle_mut(image, (x.round() as i32, y.round() as i32), radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_vein_color_contrasts_with_base() {
        assert_eq!(vein_color(Rgb([0, 0, 0])), Rgb([127, 127, 127]));
        assert_eq!(vein_color(Rgb([200, 200, 200])), Rgb([110, 110, 110]));
        assert!(luma(vein_color(Rgb([30, 20, 60]))) > luma(Rgb([30, 20, 60])));
    }

    #[test]
    fn test_stroke_is_clipped() {
        let mut img = RgbImage::new(10, 10);
        stroke_segment(&mut img, (-20, 5), (30, 5), 4, Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(5, 5), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(5, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_marble_has_veins() {
        let base = Rgb([20, 20, 30]);
        let img = marble(200, 200, base, &mut StdRng::seed_from_u64(5));
        assert_eq!(img.dimensions(), (200, 200));
        assert!(img.pixels().any(|p| luma(*p) > luma(base) + 2.0));
    }

    #[test]
    fn test_marble_seeded_is_reproducible() {
        let a = marble(64, 64, Rgb([220, 220, 220]), &mut StdRng::seed_from_u64(9));
        let b = marble(64, 64, Rgb([220, 220, 220]), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
