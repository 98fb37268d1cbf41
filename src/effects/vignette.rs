//! Radial darkening

use super::Effect;
use crate::{
    error::{Result, StudioError},
    utils::{from_array, to_array},
};
use image::RgbImage;
use ndarray::{Array1, Array2, Axis};

/// Radial vignette
///
/// Each pixel is scaled by `1 - (d / d_max) * strength`, floored at zero,
/// where `d` is the distance to `center` and `d_max` is the canvas
/// half-diagonal. `center` is given as fractions of width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vignette {
    pub strength: f32,
    pub center: (f32, f32),
}

impl Vignette {
    /// Vignette centered on the canvas
    #[must_use]
    pub fn centered(strength: f32) -> Self {
        Self {
            strength,
            center: (0.5, 0.5),
        }
    }

    #[must_use]
    pub fn with_center(mut self, x: f32, y: f32) -> Self {
        self.center = (x, y);
        self
    }

    /// Per-pixel brightness multipliers, shaped `(height, width)`
    #[must_use]
    pub fn mask(&self, width: u32, height: u32) -> Array2<f32> {
        let (w, h) = (width as f32, height as f32);
        let (cx, cy) = (self.center.0 * w, self.center.1 * h);
        let max_distance = ((w / 2.0).powi(2) + (h / 2.0).powi(2)).sqrt().max(f32::EPSILON);

        let dx2 = Array1::from_shape_fn(width as usize, |x| (x as f32 - cx).powi(2));
        let dy2 = Array1::from_shape_fn(height as usize, |y| (y as f32 - cy).powi(2));
        let distance = (&dy2.insert_axis(Axis(1)) + &dx2.insert_axis(Axis(0))).mapv(f32::sqrt);

        distance.mapv(|d| (1.0 - d / max_distance * self.strength).max(0.0))
    }
}

impl Effect for Vignette {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        if !self.strength.is_finite() || self.strength < 0.0 {
            return Err(StudioError::processing(format!(
                "Vignette strength must be finite and non-negative, got {}",
                self.strength
            )));
        }
        if self.strength <= 0.0 || image.width() == 0 || image.height() == 0 {
            return Ok(());
        }

        let mask = self.mask(image.width(), image.height());
        let shaded = to_array(image)? * &mask.insert_axis(Axis(2));
        *image = from_array(&shaded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_zero_strength_is_noop() {
        let mut img = RgbImage::from_fn(30, 20, |x, y| Rgb([x as u8 * 8, y as u8 * 12, 99]));
        let original = img.clone();
        Vignette::centered(0.0).apply(&mut img).unwrap();
        assert_eq!(img, original);
    }

    #[test]
    fn test_darkens_with_distance() {
        let mut img = RgbImage::from_pixel(101, 101, Rgb([200, 200, 200]));
        Vignette::centered(0.5).apply(&mut img).unwrap();
        let center = img.get_pixel(50, 50)[0];
        let edge = img.get_pixel(100, 50)[0];
        let corner = img.get_pixel(0, 0)[0];
        assert!(center >= 199);
        assert!(edge < center);
        assert!(corner < edge);
        // corner sits close to the half-diagonal, so roughly half brightness
        assert!((95..=110).contains(&corner), "{corner}");
    }

    #[test]
    fn test_shifted_center() {
        let mask = Vignette::centered(0.6).with_center(0.5, 0.3).mask(100, 100);
        assert!(mask[[30, 50]] > 0.99);
        assert!(mask[[0, 50]] > mask[[99, 50]]);
    }

    #[test]
    fn test_mask_never_negative() {
        let mask = Vignette::centered(1.0).with_center(0.0, 0.0).mask(50, 50);
        assert!(mask.iter().all(|&m| (0.0..=1.0).contains(&m)));
        assert!(mask[[49, 49]].abs() < f32::EPSILON);
    }
}
