//! Configuration types for compositing pipeline invocations

use crate::{
    error::{Result, StudioError},
    palette::{parse_hex_color, resolve_palette, Palette},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Background synthesis algorithm
///
/// Unknown names deserialize to [`BackgroundStyle::Unrecognized`], which
/// renders the default dark-navy gradient instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum BackgroundStyle {
    /// Vertical two-color gradient
    #[default]
    Gradient,
    /// Soft per-pixel noise over a base color
    Velvet,
    /// Random vein strokes over a base color
    Marble,
    /// Solid fill
    Minimal,
    /// Gradient with sparkles
    Festive,
    /// Woven fabric texture (noise plus wave interference)
    Textured,
    /// Any other name
    Unrecognized,
}

impl BackgroundStyle {
    /// Map a style name to a variant, case-insensitively
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "gradient" => Self::Gradient,
            "velvet" => Self::Velvet,
            "marble" => Self::Marble,
            "minimal" => Self::Minimal,
            "festive" => Self::Festive,
            "textured" | "fabric" => Self::Textured,
            _ => Self::Unrecognized,
        }
    }

    /// Whether this style consumes two colors
    #[must_use]
    pub fn is_two_color(self) -> bool {
        matches!(self, Self::Gradient | Self::Festive)
    }
}

impl From<String> for BackgroundStyle {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for BackgroundStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gradient => write!(f, "gradient"),
            Self::Velvet => write!(f, "velvet"),
            Self::Marble => write!(f, "marble"),
            Self::Minimal => write!(f, "minimal"),
            Self::Festive => write!(f, "festive"),
            Self::Textured => write!(f, "textured"),
            Self::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Lighting preset applied first in the effects chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum LightingPreset {
    /// Darken, then a centered vignette
    Moody,
    /// Brighten, then a light blur
    SoftGlow,
    /// Vignette with the light source toward the top
    Spotlight,
    /// Slight brightness and contrast lift
    Studio,
    /// Identity
    #[default]
    None,
}

impl LightingPreset {
    /// Map a preset name to a variant; unknown names fall back to `None`
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "moody" => Self::Moody,
            "soft-glow" | "softglow" => Self::SoftGlow,
            "spotlight" => Self::Spotlight,
            "studio" => Self::Studio,
            _ => Self::None,
        }
    }
}

impl From<String> for LightingPreset {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for LightingPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moody => write!(f, "moody"),
            Self::SoftGlow => write!(f, "soft-glow"),
            Self::Spotlight => write!(f, "spotlight"),
            Self::Studio => write!(f, "studio"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Color grading "mood"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum ColorGrading {
    Warm,
    Cool,
    Dramatic,
    Luxury,
    /// Identity
    #[default]
    Neutral,
}

impl ColorGrading {
    /// Map a grading name to a variant; unknown names fall back to `Neutral`
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "warm" => Self::Warm,
            "cool" => Self::Cool,
            "dramatic" => Self::Dramatic,
            "luxury" => Self::Luxury,
            _ => Self::Neutral,
        }
    }
}

impl From<String> for ColorGrading {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for ColorGrading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warm => write!(f, "warm"),
            Self::Cool => write!(f, "cool"),
            Self::Dramatic => write!(f, "dramatic"),
            Self::Luxury => write!(f, "luxury"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Output quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// 1080x1080
    #[default]
    Standard,
    /// 1920x1920
    Hd,
    /// 2160x2160
    #[serde(rename = "4k")]
    UltraHd,
}

impl QualityTier {
    #[must_use]
    pub fn canvas_size(self) -> CanvasSize {
        match self {
            Self::Standard => CanvasSize::square(1080),
            Self::Hd => CanvasSize::square(1920),
            Self::UltraHd => CanvasSize::square(2160),
        }
    }
}

/// Target output dimensions, fixed for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Largest accepted canvas side
    pub const MAX_SIDE: u32 = 16_384;

    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    #[must_use]
    pub fn dimensions(self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Shorter of the two sides
    #[must_use]
    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// Reject zero-area and oversized canvases
    pub fn validate(self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StudioError::config(format!(
                "Canvas must have non-zero area, got {}",
                self
            )));
        }
        if self.width > Self::MAX_SIDE || self.height > Self::MAX_SIDE {
            return Err(StudioError::config_value_error(
                "canvas side",
                self.width.max(self.height),
                "1-16384",
                Some(1080),
            ));
        }
        Ok(())
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        QualityTier::Standard.canvas_size()
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Style configuration for one pipeline invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    /// Background synthesis algorithm
    pub background_style: BackgroundStyle,

    /// Hex colors; two-color styles use the first two, others the first
    pub gradient_colors: Vec<String>,

    /// Free-text descriptor resolved to a palette when no colors are given
    pub background_prompt: Option<String>,

    /// Brightness factor applied to the synthesized background (1.0 keeps it)
    pub background_brightness: f64,

    /// Lighting preset
    pub lighting_preset: LightingPreset,

    /// Window shadow intensity (0.0-1.0, 0 disables)
    pub shadow_intensity: f32,

    /// Vignette strength (0.0-1.0, 0 disables)
    pub vignette_strength: f32,

    /// Color grading
    pub color_grading: ColorGrading,

    /// Strip light backgrounds from the source before compositing
    pub remove_background: bool,

    /// Run the final quality enhancement pass
    pub enhance: bool,

    /// Seed for the stochastic generators (random when unset)
    pub seed: Option<u64>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_style: BackgroundStyle::default(),
            gradient_colors: Vec::new(),
            background_prompt: None,
            background_brightness: 1.0,
            lighting_preset: LightingPreset::default(),
            shadow_intensity: 0.0,
            vignette_strength: 0.0,
            color_grading: ColorGrading::default(),
            remove_background: true,
            enhance: true,
            seed: None,
        }
    }
}

impl StyleConfig {
    /// Prompt used by [`StyleConfig::basic`] when the caller gives none
    pub const DEFAULT_BASIC_PROMPT: &'static str = "elegant dark blue gradient";

    /// Background darkening of the basic variant
    pub const BASIC_BACKGROUND_BRIGHTNESS: f64 = 0.9;

    /// Create a new configuration builder
    ///
    /// # Examples
    /// ```rust
    /// use drisya_studio::config::{BackgroundStyle, ColorGrading, LightingPreset, StyleConfig};
    ///
    /// let style = StyleConfig::builder()
    ///     .background_style(BackgroundStyle::Velvet)
    ///     .lighting_preset(LightingPreset::Moody)
    ///     .color_grading(ColorGrading::Luxury)
    ///     .vignette_strength(0.25)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(style.vignette_strength, 0.25);
    /// ```
    #[must_use]
    pub fn builder() -> StyleConfigBuilder {
        StyleConfigBuilder::default()
    }

    /// The plain compositing variant
    ///
    /// Renders the prompt's gradient darkened to 90% and skips lighting,
    /// shadow, vignette, grading and enhancement. A blank prompt falls back
    /// to [`StyleConfig::DEFAULT_BASIC_PROMPT`].
    ///
    /// # Examples
    /// ```rust
    /// use drisya_studio::config::StyleConfig;
    ///
    /// let style = StyleConfig::basic("");
    /// assert_eq!(style.background_prompt.as_deref(), Some(StyleConfig::DEFAULT_BASIC_PROMPT));
    /// assert_eq!(style.background_brightness, 0.9);
    /// ```
    #[must_use]
    pub fn basic<S: Into<String>>(prompt: S) -> Self {
        let prompt: String = prompt.into();
        let prompt = if prompt.trim().is_empty() {
            Self::DEFAULT_BASIC_PROMPT.to_string()
        } else {
            prompt
        };
        Self {
            background_style: BackgroundStyle::Gradient,
            background_prompt: Some(prompt),
            background_brightness: Self::BASIC_BACKGROUND_BRIGHTNESS,
            enhance: false,
            ..Self::default()
        }
    }

    /// Validate all configuration parameters
    ///
    /// # Validation Rules
    ///
    /// - Shadow intensity and vignette strength: finite, 0.0-1.0
    /// - Background brightness: finite, 0.0-2.0
    /// - Every gradient color parses as `#rrggbb`
    /// - Gradient and festive styles given explicit colors need at least two
    pub fn validate(&self) -> Result<()> {
        validate_unit_interval("shadow intensity", self.shadow_intensity, 0.4)?;
        validate_unit_interval("vignette strength", self.vignette_strength, 0.25)?;

        let brightness = self.background_brightness;
        if !brightness.is_finite() || !(0.0..=2.0).contains(&brightness) {
            return Err(StudioError::config_value_error(
                "background brightness",
                brightness,
                "0.0-2.0",
                Some(1.0),
            ));
        }

        for color in &self.gradient_colors {
            parse_hex_color(color)?;
        }

        if self.background_style.is_two_color() && self.gradient_colors.len() == 1 {
            return Err(StudioError::config(format!(
                "Background style '{}' needs at least two gradient colors, got 1",
                self.background_style
            )));
        }

        Ok(())
    }

    /// Resolve the palette this style renders with
    ///
    /// Explicit colors win; otherwise the prompt (or an empty descriptor) goes
    /// through the keyword table.
    pub fn palette(&self) -> Result<Palette> {
        let mut colors = self.gradient_colors.iter().map(|c| parse_hex_color(c));
        match colors.next() {
            Some(primary) => {
                let primary = primary?;
                let secondary = colors.next().transpose()?.unwrap_or(primary);
                Ok(Palette { primary, secondary })
            },
            None => Ok(resolve_palette(
                self.background_prompt.as_deref().unwrap_or_default(),
            )),
        }
    }

    /// Whether the synthesized background gets a brightness pass
    #[must_use]
    pub fn background_adjusted(&self) -> bool {
        (self.background_brightness - 1.0).abs() > f64::EPSILON
    }

    /// Whether the shadow stage runs
    #[must_use]
    pub fn shadow_enabled(&self) -> bool {
        self.shadow_intensity > 0.0
    }

    /// Whether the standalone vignette stage runs
    #[must_use]
    pub fn vignette_enabled(&self) -> bool {
        self.vignette_strength > 0.0
    }
}

fn validate_unit_interval(parameter: &str, value: f32, recommended: f32) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(StudioError::config_value_error(
            parameter,
            value,
            "0.0-1.0",
            Some(recommended),
        ));
    }
    Ok(())
}

/// Builder for `StyleConfig`
#[derive(Debug, Default)]
pub struct StyleConfigBuilder {
    config: StyleConfig,
}

impl StyleConfigBuilder {
    #[must_use]
    pub fn background_style(mut self, style: BackgroundStyle) -> Self {
        self.config.background_style = style;
        self
    }

    #[must_use]
    pub fn gradient_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.gradient_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn background_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.config.background_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn background_brightness(mut self, factor: f64) -> Self {
        self.config.background_brightness = factor;
        self
    }

    #[must_use]
    pub fn lighting_preset(mut self, preset: LightingPreset) -> Self {
        self.config.lighting_preset = preset;
        self
    }

    #[must_use]
    pub fn shadow_intensity(mut self, intensity: f32) -> Self {
        self.config.shadow_intensity = intensity;
        self
    }

    #[must_use]
    pub fn vignette_strength(mut self, strength: f32) -> Self {
        self.config.vignette_strength = strength;
        self
    }

    #[must_use]
    pub fn color_grading(mut self, grading: ColorGrading) -> Self {
        self.config.color_grading = grading;
        self
    }

    #[must_use]
    pub fn remove_background(mut self, remove: bool) -> Self {
        self.config.remove_background = remove;
        self
    }

    #[must_use]
    pub fn enhance(mut self, enhance: bool) -> Self {
        self.config.enhance = enhance;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// - Shadow intensity or vignette strength outside 0.0-1.0
    /// - Background brightness outside 0.0-2.0
    /// - Unparseable gradient color
    /// - Two-color style with a single explicit color
    pub fn build(self) -> Result<StyleConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
