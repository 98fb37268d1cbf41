//! Window-pane shadow: soft vertical bars as if light fell through a window
//!
//! The bars span the full canvas height, so blurring the shadow layer in 2D
//! reduces to blurring a single column profile horizontally. The profile is
//! computed once and broadcast over every row.

use super::Effect;
use crate::{
    error::{Result, StudioError},
    utils::{from_array, to_array},
};
use image::RgbImage;
use ndarray::{s, Array1, Axis};

/// Number of bars
pub const BAR_COUNT: u32 = 4;
/// Bar width as a fraction of canvas width (`1 / BAR_WIDTH_DIVISOR`)
pub const BAR_WIDTH_DIVISOR: u32 = 12;
/// Peak bar opacity at intensity 1.0, out of 255
pub const MAX_ALPHA: f32 = 180.0;
/// Blur applied to the bar layer
pub const SHADOW_BLUR: f32 = 15.0;

/// Black bars composited over the canvas at `intensity * 180/255` opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowShadow {
    pub intensity: f32,
}

impl WindowShadow {
    #[must_use]
    pub fn new(intensity: f32) -> Self {
        Self { intensity }
    }

    /// Left edges of the bars; bar `i` is centered on `(i + 1) / 5` of the width
    #[must_use]
    pub fn bar_positions(width: u32) -> Vec<i64> {
        let bar_width = i64::from(width / BAR_WIDTH_DIVISOR);
        (1..=BAR_COUNT)
            .map(|i| i64::from(width) * i64::from(i) / i64::from(BAR_COUNT + 1) - bar_width / 2)
            .collect()
    }

    /// Shadow opacity per column (0.0-1.0), after blurring
    #[must_use]
    pub fn column_alpha(&self, width: u32) -> Array1<f32> {
        let alpha = self.intensity * MAX_ALPHA / 255.0;
        let bar_width = i64::from(width / BAR_WIDTH_DIVISOR);

        let mut profile = Array1::<f32>::zeros(width as usize);
        for left in Self::bar_positions(width) {
            let start = left.clamp(0, i64::from(width)) as usize;
            let end = (left + bar_width).clamp(0, i64::from(width)) as usize;
            profile.slice_mut(s![start..end]).fill(alpha);
        }

        blur_profile(&profile, SHADOW_BLUR)
    }
}

impl Effect for WindowShadow {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        if !self.intensity.is_finite() || !(0.0..=1.0).contains(&self.intensity) {
            return Err(StudioError::processing(format!(
                "Shadow intensity must be within 0.0-1.0, got {}",
                self.intensity
            )));
        }
        if self.intensity <= 0.0 || image.width() == 0 || image.height() == 0 {
            return Ok(());
        }

        let keep = self.column_alpha(image.width()).mapv(|a| 1.0 - a);
        let shaded = to_array(image)? * &keep.insert_axis(Axis(1));
        *image = from_array(&shaded)?;
        Ok(())
    }
}

/// 1D Gaussian blur with edge samples repeated past the ends
fn blur_profile(profile: &Array1<f32>, sigma: f32) -> Array1<f32> {
    let len = profile.len();
    if len == 0 || sigma <= 0.0 {
        return profile.clone();
    }

    let radius = (sigma * 3.0).ceil() as i64;
    let weights: Vec<f32> = (-radius..=radius)
        .map(|k| (-(k * k) as f32 / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    let last = len as i64 - 1;

    Array1::from_shape_fn(len, |i| {
        (-radius..=radius)
            .zip(&weights)
            .map(|(k, w)| {
                let j = (i as i64 + k).clamp(0, last) as usize;
                profile[j] * w
            })
            .sum::<f32>()
            / total
    })
}
