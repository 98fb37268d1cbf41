//! Primitive tonal and color adjustments
//!
//! The enhancers (`Brightness`, `Contrast`, `Saturation`, `Sharpness`) share
//! one model: each builds a degenerate version of the image and extrapolates
//! `out = degenerate + factor * (image - degenerate)`. A factor of 1.0 is the
//! identity; per-value adjustments go through 256-entry lookup tables.

use super::Effect;
use crate::{
    error::{Result, StudioError},
    palette::luma,
    utils::{clamp_u8, convolve3x3, from_array, gaussian_blur, to_array},
};
use image::{Rgb, RgbImage};

/// 3x3 smoothing kernel used as the sharpness degenerate
const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];

type Lut = [u8; 256];

fn build_lut(f: impl Fn(f32) -> f32) -> Lut {
    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        *slot = clamp_u8(f(value as f32));
    }
    lut
}

fn apply_luts(image: &mut RgbImage, luts: [&Lut; 3]) {
    for pixel in image.pixels_mut() {
        for (channel, lut) in pixel.0.iter_mut().zip(luts) {
            *channel = lut[usize::from(*channel)];
        }
    }
}

fn check_factor(name: &str, factor: f64) -> Result<()> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(StudioError::processing(format!(
            "{} factor must be finite and non-negative, got {}",
            name, factor
        )))
    }
}

/// Scale every channel; 0.0 gives black
///
/// The product is taken in `f64` so decimal factors round the way they read:
/// `35 * 0.9` lands on 31.5 and rounds up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brightness(pub f64);

impl Effect for Brightness {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        check_factor("Brightness", self.0)?;
        let factor = self.0;
        let lut = build_lut(|v| (f64::from(v) * factor) as f32);
        apply_luts(image, [&lut, &lut, &lut]);
        Ok(())
    }
}

/// Stretch channels away from the mean gray level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast(pub f32);

impl Effect for Contrast {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        check_factor("Contrast", f64::from(self.0))?;
        let pixels = u64::from(image.width()) * u64::from(image.height());
        if pixels == 0 {
            return Ok(());
        }
        let total: f64 = image.pixels().map(|p| f64::from(luma(*p))).sum();
        let mean = (total / pixels as f64).round() as f32;

        let lut = build_lut(|v| mean + self.0 * (v - mean));
        apply_luts(image, [&lut, &lut, &lut]);
        Ok(())
    }
}

/// Extrapolate each pixel away from its own luma
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saturation(pub f32);

impl Effect for Saturation {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        check_factor("Saturation", f64::from(self.0))?;
        let factor = self.0;
        for pixel in image.pixels_mut() {
            let gray = luma(*pixel);
            pixel.0 = pixel.0.map(|c| clamp_u8(gray + factor * (f32::from(c) - gray)));
        }
        Ok(())
    }
}

/// Extrapolate away from a 3x3-smoothed copy; border pixels are unchanged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpness(pub f32);

impl Effect for Sharpness {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        check_factor("Sharpness", f64::from(self.0))?;
        if (self.0 - 1.0).abs() < f32::EPSILON {
            return Ok(());
        }
        let smooth = to_array(&convolve3x3(image, &SMOOTH_KERNEL)?)?;
        let original = to_array(image)?;
        let sharpened = &smooth + &((&original - &smooth) * self.0);
        *image = from_array(&sharpened)?;
        Ok(())
    }
}

/// Per-channel histogram stretch after clipping `cutoff` percent from each tail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoContrast {
    pub cutoff: f32,
}

impl Default for AutoContrast {
    fn default() -> Self {
        Self { cutoff: 1.0 }
    }
}

impl AutoContrast {
    /// Lookup table for one channel histogram
    fn channel_lut(&self, histogram: &[u64; 256], pixels: u64) -> Lut {
        let mut histogram = *histogram;
        let cut = (pixels as f64 * f64::from(self.cutoff) / 100.0) as u64;

        trim_tail(histogram.iter_mut(), cut);
        trim_tail(histogram.iter_mut().rev(), cut);

        let lo = histogram.iter().position(|&count| count > 0);
        let hi = histogram.iter().rposition(|&count| count > 0);
        match (lo, hi) {
            (Some(lo), Some(hi)) if hi > lo => {
                let scale = 255.0 / (hi - lo) as f32;
                build_lut(|v| (v - lo as f32) * scale)
            },
            _ => build_lut(|v| v),
        }
    }
}

/// Remove up to `cut` samples from the bins yielded by `bins`, in order
fn trim_tail<'a>(bins: impl Iterator<Item = &'a mut u64>, mut cut: u64) {
    for count in bins {
        if cut == 0 {
            break;
        }
        let taken = cut.min(*count);
        *count -= taken;
        cut -= taken;
    }
}

impl Effect for AutoContrast {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        if !(0.0..50.0).contains(&self.cutoff) {
            return Err(StudioError::config_value_error(
                "autocontrast cutoff",
                self.cutoff,
                "0.0-50.0",
                Some(1.0),
            ));
        }

        let mut histograms = [[0u64; 256]; 3];
        for pixel in image.pixels() {
            for (histogram, &value) in histograms.iter_mut().zip(&pixel.0) {
                histogram[usize::from(value)] += 1;
            }
        }

        let pixels = u64::from(image.width()) * u64::from(image.height());
        let [r, g, b] = histograms.map(|h| self.channel_lut(&h, pixels));
        apply_luts(image, [&r, &g, &b]);
        Ok(())
    }
}

/// Multiply individual channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelScale(pub [f32; 3]);

impl Effect for ChannelScale {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        let [r, g, b] = self.0;
        for (name, factor) in [("Red", r), ("Green", g), ("Blue", b)] {
            check_factor(name, f64::from(factor))?;
        }
        let luts = [
            build_lut(|v| v * r),
            build_lut(|v| v * g),
            build_lut(|v| v * b),
        ];
        apply_luts(image, [&luts[0], &luts[1], &luts[2]]);
        Ok(())
    }
}

/// Gaussian blur; `radius` is the standard deviation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blur {
    pub radius: f32,
}

impl Effect for Blur {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        if self.radius > 0.0 {
            *image = gaussian_blur(image, self.radius);
        }
        Ok(())
    }
}

/// Mean color of a canvas, handy for coarse assertions and logging
#[must_use]
pub fn mean_color(image: &RgbImage) -> Rgb<f32> {
    let pixels = (u64::from(image.width()) * u64::from(image.height())).max(1) as f64;
    let mut sums = [0f64; 3];
    for pixel in image.pixels() {
        for (sum, &value) in sums.iter_mut().zip(&pixel.0) {
            *sum += f64::from(value);
        }
    }
    Rgb(sums.map(|s| (s / pixels) as f32))
}
