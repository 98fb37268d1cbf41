#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Drisya Studio
//!
//! A product photo compositing pipeline: it strips the light backdrop from a
//! product shot, renders a procedural studio background, centers the product
//! on it and runs a stylistic effects chain over the result.
//!
//! ## Pipeline
//!
//! Every render runs the same fixed stage order:
//!
//! 1. **Background removal**: pixels brighter than a threshold on every
//!    channel become transparent
//! 2. **Synthesis**: gradient, velvet, marble, minimal, festive or textured
//!    background at the canvas size
//! 3. **Composite**: the product is scaled to fit 70% of the shorter canvas
//!    side and centered
//! 4. **Lighting**: moody, soft glow, spotlight or studio preset
//! 5. **Shadow**: vertical window-bar shadows
//! 6. **Vignette**: radial darkening
//! 7. **Grading**: warm, cool, dramatic or luxury
//! 8. **Enhancement**: autocontrast, sharpness, saturation and brightness
//! 9. **Resize**: forced to the exact canvas dimensions
//!
//! Stages whose parameter is unset or neutral are skipped.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drisya_studio::{
//!     BackgroundStyle, ColorGrading, LightingPreset, ProcessorConfig, QualityTier,
//!     StudioProcessor, StyleConfig,
//! };
//!
//! # fn example() -> anyhow::Result<()> {
//! let processor = StudioProcessor::new(
//!     ProcessorConfig::builder().quality(QualityTier::Hd).build()?,
//! )?;
//! let style = StyleConfig::builder()
//!     .background_style(BackgroundStyle::Velvet)
//!     .gradient_colors(["#4a0e4e"])
//!     .lighting_preset(LightingPreset::SoftGlow)
//!     .vignette_strength(0.25)
//!     .color_grading(ColorGrading::Luxury)
//!     .build()?;
//!
//! let source = image::open("ring.jpg")?;
//! let result = processor.process(&source, &style)?;
//! result.image.save("ring_studio.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): command-line interface, tracing subscriber and progress bars
//! - `webp-support` (default): WebP input and output
//! - `tracing-json`: JSON log output for the CLI
//!
//! ### Library-Only Usage
//!
//! ```toml
//! [dependencies]
//! drisya-studio = { version = "0.1", default-features = false }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod composite;
pub mod config;
pub mod effects;
pub mod error;
pub mod palette;
pub mod processor;
pub mod removal;
pub mod services;
pub mod synthesis;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;
pub mod utils;

use image::{DynamicImage, RgbImage};

// Public API exports
pub use composite::{Compositor, Placement};
pub use config::{
    BackgroundStyle, CanvasSize, ColorGrading, LightingPreset, QualityTier, StyleConfig,
    StyleConfigBuilder,
};
pub use effects::{Effect, Enhance, Vignette, WindowShadow};
pub use error::{Result, StudioError};
pub use palette::{parse_hex_color, resolve_palette, Palette};
pub use processor::{ProcessorConfig, ProcessorConfigBuilder, StudioProcessor};
pub use removal::BackgroundRemover;
pub use services::{ImageIOService, OutputFormat};
pub use synthesis::BackgroundSynthesizer;
pub use types::{ProcessingTimings, RenderResult};

#[cfg(feature = "cli")]
pub use tracing_config::{
    cli_tracing_config, init_cli_tracing, spans, TracingConfig, TracingFormat,
};

/// Render a decoded source image onto a studio background
///
/// Convenience wrapper that builds a [`StudioProcessor`] for `canvas` and
/// returns only the final image. Use the processor directly to reuse it
/// across calls or to get stage timings.
///
/// # Examples
///
/// ```rust
/// use drisya_studio::{process, CanvasSize, StyleConfig};
/// use image::{DynamicImage, Rgb, RgbImage};
///
/// let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([120, 60, 30])));
/// let style = StyleConfig::basic("luxury gold");
/// let image = process(&source, &style, CanvasSize::new(96, 64)).unwrap();
/// assert_eq!(image.dimensions(), (96, 64));
/// ```
pub fn process(
    source: &DynamicImage,
    style: &StyleConfig,
    canvas: CanvasSize,
) -> Result<RgbImage> {
    let processor = StudioProcessor::with_canvas(canvas)?;
    Ok(processor.process(source, style)?.into_image())
}

/// Decode image bytes (PNG, JPEG, TIFF, WebP) and render them
///
/// Suitable for upload handlers where the source never touches disk.
///
/// # Errors
///
/// - `StudioError::Decode` when the bytes are not a readable image
/// - Any error from [`process`]
pub fn process_bytes(bytes: &[u8], style: &StyleConfig, canvas: CanvasSize) -> Result<RgbImage> {
    let processor = StudioProcessor::with_canvas(canvas)?;
    Ok(processor.process_bytes(bytes, style)?.into_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    #[test]
    fn test_process_bytes_matches_process() {
        let source = RgbImage::from_pixel(32, 24, Rgb([30, 90, 150]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let style = StyleConfig::builder()
            .background_style(BackgroundStyle::Marble)
            .seed(11)
            .build()
            .unwrap();
        let canvas = CanvasSize::new(50, 40);

        let from_bytes = process_bytes(&bytes, &style, canvas).unwrap();
        let direct = process(&DynamicImage::ImageRgb8(source), &style, canvas).unwrap();
        assert_eq!(from_bytes, direct);
    }

    #[test]
    fn test_process_rejects_zero_canvas() {
        let source = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let err = process(&source, &StyleConfig::default(), CanvasSize::new(0, 0)).unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
    }
}
