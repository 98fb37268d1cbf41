//! Noise-driven textures: velvet and woven fabric
//!
//! Both generators build a single-channel signal grid with `ndarray`, add it
//! to the base color across all three channels in one broadcast, then soften
//! the result. The fabric wave term is separable, so it is an outer product of
//! a column of cosines and a row of sines rather than a per-pixel evaluation.

use crate::{
    error::Result,
    utils::{convolve3x3, from_array, gaussian_blur},
};
use image::{Rgb, RgbImage};
use ndarray::{Array1, Array2, Array3, Axis};
use rand::Rng;

/// Velvet noise amplitude (inclusive, per pixel)
pub const VELVET_NOISE: i16 = 15;
/// Velvet softening blur radius
pub const VELVET_BLUR: f32 = 3.0;

/// Fabric noise amplitude (inclusive, per pixel)
pub const FABRIC_NOISE: i16 = 25;
/// Fabric interference amplitude
pub const FABRIC_WAVE_AMPLITUDE: f32 = 10.0;
/// Fabric interference period divisor, in pixels
pub const FABRIC_WAVE_SCALE: f32 = 30.0;
/// Fabric softening blur radius
pub const FABRIC_BLUR: f32 = 4.0;

/// Detail-enhancement kernel applied after the fabric blur
const DETAIL_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 10.0, -1.0, 0.0, -1.0, 0.0];

/// Base color plus uniform per-pixel noise, blurred
pub fn velvet<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    base: Rgb<u8>,
    rng: &mut R,
) -> Result<RgbImage> {
    let noise = uniform_noise(width, height, VELVET_NOISE, rng);
    let shaded = shade(base, &noise)?;
    Ok(gaussian_blur(&shaded, VELVET_BLUR))
}

/// Base color plus noise and a `sin(x/30)·cos(y/30)` weave, blurred and detail-enhanced
pub fn fabric<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    base: Rgb<u8>,
    rng: &mut R,
) -> Result<RgbImage> {
    let noise = uniform_noise(width, height, FABRIC_NOISE, rng);
    let signal = noise + &(weave(width, height) * FABRIC_WAVE_AMPLITUDE);
    let shaded = shade(base, &signal)?;
    let softened = gaussian_blur(&shaded, FABRIC_BLUR);
    convolve3x3(&softened, &DETAIL_KERNEL)
}

/// Interference pattern `sin(x/30)·cos(y/30)` over an `(h, w)` grid
#[must_use]
pub fn weave(width: u32, height: u32) -> Array2<f32> {
    let sines = Array1::from_shape_fn(width as usize, |x| (x as f32 / FABRIC_WAVE_SCALE).sin());
    let cosines =
        Array1::from_shape_fn(height as usize, |y| (y as f32 / FABRIC_WAVE_SCALE).cos());
    &cosines.insert_axis(Axis(1)) * &sines.insert_axis(Axis(0))
}

fn uniform_noise<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    amplitude: i16,
    rng: &mut R,
) -> Array2<f32> {
    Array2::from_shape_simple_fn((height as usize, width as usize), || {
        f32::from(rng.random_range(-amplitude..=amplitude))
    })
}

/// Add a single-channel signal to every channel of `base`, clamping to 0-255
fn shade(base: Rgb<u8>, signal: &Array2<f32>) -> Result<RgbImage> {
    let base = Array1::from(vec![
        f32::from(base[0]),
        f32::from(base[1]),
        f32::from(base[2]),
    ]);
    let grid: Array3<f32> = &signal.view().insert_axis(Axis(2)) + &base;
    from_array(&grid)
}
