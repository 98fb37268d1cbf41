//! Final quality enhancement pass

use super::{apply_all, AutoContrast, Brightness, Effect, Saturation, Sharpness};
use crate::error::Result;
use image::RgbImage;

/// Auto-contrast, then sharpness, saturation and brightness boosts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enhance {
    pub autocontrast: AutoContrast,
    pub sharpness: f32,
    pub saturation: f32,
    pub brightness: f64,
}

impl Default for Enhance {
    fn default() -> Self {
        Self {
            autocontrast: AutoContrast::default(),
            sharpness: 1.3,
            saturation: 1.1,
            brightness: 1.05,
        }
    }
}

impl Effect for Enhance {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        apply_all(
            image,
            &[
                &self.autocontrast,
                &Sharpness(self.sharpness),
                &Saturation(self.saturation),
                &Brightness(self.brightness),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_enhance_stretches_low_contrast_input() {
        let mut img = RgbImage::from_fn(20, 20, |x, _| {
            let v = 100 + x as u8;
            Rgb([v, v, v])
        });
        Enhance::default().apply(&mut img).unwrap();
        assert!(img.get_pixel(1, 10)[0] < 30);
        assert!(img.get_pixel(18, 10)[0] > 225);
        assert_eq!(img.dimensions(), (20, 20));
    }
}
