//! Procedural background synthesis
//!
//! Every generator returns an RGB canvas of exactly the requested size.
//! Stochastic generators draw from the caller's RNG, so a seeded generator
//! gives pixel-identical output.

pub mod festive;
pub mod gradient;
pub mod marble;
pub mod texture;

pub use festive::festive;
pub use gradient::{solid, vertical_gradient};
pub use marble::marble;
pub use texture::{fabric, velvet};

use crate::{
    config::{BackgroundStyle, CanvasSize, StyleConfig},
    effects::{Brightness, Effect},
    error::Result,
    palette::DEFAULT_PALETTE,
};
use image::RgbImage;
use rand::Rng;
use tracing::debug;

/// Renders the background named by a [`StyleConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundSynthesizer;

impl BackgroundSynthesizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render the style's background at `canvas` size
    ///
    /// # Errors
    /// - Invalid canvas size
    /// - Unparseable gradient colors
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        canvas: CanvasSize,
        style: &StyleConfig,
        rng: &mut R,
    ) -> Result<RgbImage> {
        canvas.validate()?;
        let (width, height) = canvas.dimensions();
        let palette = style.palette()?;

        debug!(
            style = %style.background_style,
            primary = ?palette.primary,
            secondary = ?palette.secondary,
            canvas = %canvas,
            "Synthesizing background"
        );

        let mut image = match style.background_style {
            BackgroundStyle::Gradient => {
                vertical_gradient(width, height, palette.primary, palette.secondary)
            },
            BackgroundStyle::Velvet => velvet(width, height, palette.primary, rng)?,
            BackgroundStyle::Marble => marble(width, height, palette.primary, rng),
            BackgroundStyle::Minimal => solid(width, height, palette.primary),
            BackgroundStyle::Festive => {
                festive(width, height, palette.primary, palette.secondary, rng)
            },
            BackgroundStyle::Textured => fabric(width, height, palette.primary, rng)?,
            BackgroundStyle::Unrecognized => vertical_gradient(
                width,
                height,
                DEFAULT_PALETTE.primary,
                DEFAULT_PALETTE.secondary,
            ),
        };

        if style.background_adjusted() {
            Brightness(style.background_brightness).apply(&mut image)?;
        }

        Ok(image)
    }
}
