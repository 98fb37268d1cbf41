//! Bridges between `image` buffers and `ndarray` grids
//!
//! Whole-canvas arithmetic (texture synthesis, vignette masks, convolution)
//! runs on `Array3<f32>` grids shaped `(height, width, channel)` and is
//! converted back to 8-bit buffers once at the end.

use crate::error::{Result, StudioError};
use image::RgbImage;
use ndarray::{s, Array3};

/// Convert an RGB buffer into an `(h, w, 3)` float grid
pub fn to_array(image: &RgbImage) -> Result<Array3<f32>> {
    let (width, height) = image.dimensions();
    let data: Vec<f32> = image.as_raw().iter().map(|&v| f32::from(v)).collect();
    Array3::from_shape_vec((height as usize, width as usize, 3), data).map_err(|e| {
        StudioError::processing(format!(
            "Failed to view {}x{} image as grid: {}",
            width, height, e
        ))
    })
}

/// Convert an `(h, w, 3)` float grid back to RGB, rounding and clamping to 0-255
pub fn from_array(array: &Array3<f32>) -> Result<RgbImage> {
    let (height, width, channels) = array.dim();
    if channels != 3 {
        return Err(StudioError::processing(format!(
            "Expected 3 channels in grid, found {}",
            channels
        )));
    }

    let data: Vec<u8> = array.iter().map(|&v| clamp_u8(v)).collect();
    RgbImage::from_raw(width as u32, height as u32, data).ok_or_else(|| {
        StudioError::processing(format!(
            "Grid of {}x{} does not fit an RGB buffer",
            width, height
        ))
    })
}

/// Round and clamp a float channel value to `u8`
#[inline]
#[must_use]
pub fn clamp_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Gaussian blur where `radius` plays the role of the standard deviation
#[must_use]
pub fn gaussian_blur(image: &RgbImage, radius: f32) -> RgbImage {
    if radius <= 0.0 {
        return image.clone();
    }
    image::imageops::blur(image, radius)
}

/// Apply a normalized 3x3 kernel; border pixels keep their source values
///
/// The kernel is divided by its sum (or 1 when the sum is zero). Images
/// smaller than 3x3 are returned unchanged.
pub fn convolve3x3(image: &RgbImage, kernel: &[f32; 9]) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return Ok(image.clone());
    }

    let (w, h) = (width as usize, height as usize);
    let src = to_array(image)?;
    let sum: f32 = kernel.iter().sum();
    let norm = if sum.abs() < f32::EPSILON { 1.0 } else { sum };

    let mut out = src.clone();
    {
        let mut interior = out.slice_mut(s![1..h - 1, 1..w - 1, ..]);
        interior.fill(0.0);
        for (tap, &weight) in kernel.iter().enumerate() {
            if weight.abs() < f32::EPSILON {
                continue;
            }
            let (dy, dx) = (tap / 3, tap % 3);
            let shifted = src.slice(s![dy..h - 2 + dy, dx..w - 2 + dx, ..]);
            interior.scaled_add(weight / norm, &shifted);
        }
    }

    from_array(&out)
}
