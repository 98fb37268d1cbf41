//! Threshold-based background removal
//!
//! A pixel whose red, green and blue channels all exceed the threshold is
//! treated as backdrop and made fully transparent. There is no spatial
//! coherence or edge feathering; each pixel is decided on its own.

use image::{DynamicImage, Rgba, RgbaImage};
use log::debug;

/// Default per-channel brightness threshold
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Replacement written over removed pixels
const TRANSPARENT_WHITE: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Per-pixel light-backdrop remover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundRemover {
    threshold: u8,
}

impl Default for BackgroundRemover {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl BackgroundRemover {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom threshold; channels must be strictly greater to count as backdrop
    #[must_use]
    pub fn with_threshold(threshold: u8) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Produce an RGBA copy of `image` with light pixels made transparent
    ///
    /// Sources without alpha get alpha 255 on kept pixels.
    #[must_use]
    pub fn remove(&self, image: &DynamicImage) -> RgbaImage {
        self.remove_rgba(image.to_rgba8())
    }

    /// Same as [`Self::remove`] but consumes an RGBA buffer in place
    #[must_use]
    pub fn remove_rgba(&self, mut image: RgbaImage) -> RgbaImage {
        let mut removed = 0usize;
        for pixel in image.pixels_mut() {
            if self.is_backdrop(pixel) {
                *pixel = TRANSPARENT_WHITE;
                removed += 1;
            }
        }

        debug!(
            "Background removal: {} of {} pixels made transparent",
            removed,
            u64::from(image.width()) * u64::from(image.height())
        );
        image
    }

    fn is_backdrop(&self, pixel: &Rgba<u8>) -> bool {
        let [r, g, b, _] = pixel.0;
        r > self.threshold && g > self.threshold && b > self.threshold
    }
}
