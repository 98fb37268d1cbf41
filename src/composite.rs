//! Foreground placement and alpha compositing
//!
//! The background is always brought to the exact canvas size; the foreground
//! is only ever scaled down, keeping its aspect ratio, and centered.

use crate::{
    config::CanvasSize,
    error::{Result, StudioError},
};
use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgb, RgbImage, RgbaImage};
use tracing::debug;

/// Largest foreground side as a fraction of the shorter canvas side
pub const FOREGROUND_FRACTION: f64 = 0.7;

/// Where the foreground lands on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Scales, centers and blends a foreground over a background
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    filter: FilterType,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl Compositor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Longest side a foreground may have on this canvas
    #[must_use]
    pub fn max_foreground_side(canvas: CanvasSize) -> u32 {
        ((f64::from(canvas.min_side()) * FOREGROUND_FRACTION) as u32).max(1)
    }

    /// Compute the scaled size and centered offset of a foreground
    #[must_use]
    pub fn placement(foreground: (u32, u32), canvas: CanvasSize) -> Placement {
        let (width, height) = fit_within(foreground, Self::max_foreground_side(canvas));
        Placement {
            x: (canvas.width - width) / 2,
            y: (canvas.height - height) / 2,
            width,
            height,
        }
    }

    /// Composite `foreground` onto `background` at exactly `canvas` size
    ///
    /// Foregrounds with an alpha channel are blended; opaque ones replace the
    /// covered region.
    ///
    /// # Errors
    /// - Zero-size foreground or background
    pub fn composite(
        &self,
        foreground: &DynamicImage,
        background: RgbImage,
        canvas: CanvasSize,
    ) -> Result<RgbImage> {
        if foreground.width() == 0 || foreground.height() == 0 {
            return Err(StudioError::processing_stage_error(
                "composite",
                "foreground has zero area",
                Some(&format!("{}x{}", foreground.width(), foreground.height())),
            ));
        }

        let mut canvas_image = self.fit_background(background, canvas)?;
        let placement = Self::placement(foreground.dimensions(), canvas);

        debug!(
            x = placement.x,
            y = placement.y,
            width = placement.width,
            height = placement.height,
            has_alpha = foreground.color().has_alpha(),
            "Placing foreground"
        );

        let scaled = if (placement.width, placement.height) == foreground.dimensions() {
            foreground.clone()
        } else {
            foreground.resize_exact(placement.width, placement.height, self.filter)
        };

        if scaled.color().has_alpha() {
            overlay_rgba(&mut canvas_image, &scaled.to_rgba8(), placement.x, placement.y);
        } else {
            image::imageops::replace(
                &mut canvas_image,
                &scaled.to_rgb8(),
                i64::from(placement.x),
                i64::from(placement.y),
            );
        }

        Ok(canvas_image)
    }

    /// Resize a background to exactly `canvas`, leaving matching buffers untouched
    pub fn fit_background(&self, background: RgbImage, canvas: CanvasSize) -> Result<RgbImage> {
        if background.width() == 0 || background.height() == 0 {
            return Err(StudioError::processing_stage_error(
                "composite",
                "background has zero area",
                None,
            ));
        }
        Ok(resize_to(background, canvas, self.filter))
    }
}

/// Force an image to exactly `canvas` size
#[must_use]
pub fn resize_to(image: RgbImage, canvas: CanvasSize, filter: FilterType) -> RgbImage {
    if image.dimensions() == canvas.dimensions() {
        image
    } else {
        image::imageops::resize(&image, canvas.width, canvas.height, filter)
    }
}

/// Alpha-blend an RGBA layer over an opaque RGB base at an offset, clipping
/// anything that falls outside the base
pub fn overlay_rgba(base: &mut RgbImage, layer: &RgbaImage, x: u32, y: u32) {
    let (base_width, base_height) = base.dimensions();
    for (lx, ly, pixel) in layer.enumerate_pixels() {
        let (bx, by) = (x + lx, y + ly);
        if bx >= base_width || by >= base_height {
            continue;
        }

        let [r, g, b, a] = pixel.0;
        match a {
            0 => {},
            255 => base.put_pixel(bx, by, Rgb([r, g, b])),
            _ => {
                let alpha = f32::from(a) / 255.0;
                let under = base.get_pixel(bx, by).0;
                let mix = |top: u8, bottom: u8| {
                    (f32::from(top) * alpha + f32::from(bottom) * (1.0 - alpha)).round() as u8
                };
                base.put_pixel(
                    bx,
                    by,
                    Rgb([mix(r, under[0]), mix(g, under[1]), mix(b, under[2])]),
                );
            },
        }
    }
}

/// Scale `(width, height)` down so the longer side is at most `max_side`
fn fit_within((width, height): (u32, u32), max_side: u32) -> (u32, u32) {
    if width <= max_side && height <= max_side {
        return (width, height);
    }
    let scale = (max_side as f32 / width as f32).min(max_side as f32 / height as f32);
    let scaled = |side: u32| ((side as f32 * scale).round() as u32).clamp(1, max_side);
    (scaled(width), scaled(height))
}
