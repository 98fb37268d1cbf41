//! Full-canvas effects applied after compositing
//!
//! Every effect mutates an RGB canvas in place and never changes its
//! dimensions. Lighting presets and color gradings are closed enums that
//! expand into the primitive adjustments in [`adjust`].

pub mod adjust;
pub mod grading;
pub mod lighting;
pub mod post;
pub mod shadow;
pub mod vignette;

pub use adjust::{AutoContrast, Blur, Brightness, ChannelScale, Contrast, Saturation, Sharpness};
pub use post::Enhance;
pub use shadow::WindowShadow;
pub use vignette::Vignette;

use crate::error::Result;
use image::RgbImage;

/// In-place canvas transformation
pub trait Effect {
    fn apply(&self, image: &mut RgbImage) -> Result<()>;
}

/// Apply a sequence of effects in order, stopping at the first failure
pub fn apply_all(image: &mut RgbImage, effects: &[&dyn Effect]) -> Result<()> {
    for effect in effects {
        effect.apply(image)?;
    }
    Ok(())
}
