//! Lighting presets expanded into primitive adjustments

use super::{apply_all, Blur, Brightness, Contrast, Effect, Vignette};
use crate::{config::LightingPreset, error::Result};
use image::RgbImage;

impl Effect for LightingPreset {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        match self {
            Self::Moody => apply_all(image, &[&Brightness(0.7), &Vignette::centered(0.4)]),
            Self::SoftGlow => apply_all(image, &[&Brightness(1.1), &Blur { radius: 1.0 }]),
            // light source toward the top
            Self::Spotlight => Vignette::centered(0.6).with_center(0.5, 0.3).apply(image),
            Self::Studio => apply_all(image, &[&Brightness(1.05), &Contrast(1.1)]),
            Self::None => Ok(()),
        }
    }
}
