//! Pipeline orchestration
//!
//! [`StudioProcessor`] runs the fixed stage order: removal, synthesis,
//! composite, lighting, shadow, vignette, grading, enhancement and a forced
//! resize to the canvas. Each stage consumes the previous stage's complete
//! buffer; stages whose triggering parameter is unset are skipped outright.

use crate::{
    composite::{resize_to, Compositor},
    config::{CanvasSize, ColorGrading, LightingPreset, QualityTier, StyleConfig},
    effects::{adjust::mean_color, Effect, Enhance, Vignette, WindowShadow},
    error::{Result, StudioError},
    removal::{BackgroundRemover, DEFAULT_THRESHOLD},
    synthesis::BackgroundSynthesizer,
    types::{ProcessingTimings, RenderResult},
};
use image::{imageops::FilterType, DynamicImage, RgbImage};
use instant::Instant;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use std::borrow::Cow;
use tracing::{debug as trace_debug, info as trace_info, instrument, span, Level};

/// Processor-wide settings, fixed across invocations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Output canvas
    pub canvas: CanvasSize,
    /// Channels strictly above this value on all of R, G and B are cleared
    pub removal_threshold: u8,
    /// Render batch items on the rayon pool
    pub parallel_batch: bool,
}

impl ProcessorConfig {
    /// Create a new processor configuration builder
    #[must_use]
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::new()
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            canvas: QualityTier::Standard.canvas_size(),
            removal_threshold: DEFAULT_THRESHOLD,
            parallel_batch: true,
        }
    }
}

/// Builder for `ProcessorConfig`
#[derive(Debug)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig::default(),
        }
    }

    #[must_use]
    pub fn canvas(mut self, canvas: CanvasSize) -> Self {
        self.config.canvas = canvas;
        self
    }

    /// Shorthand for the canvas of a quality tier
    #[must_use]
    pub fn quality(mut self, quality: QualityTier) -> Self {
        self.config.canvas = quality.canvas_size();
        self
    }

    #[must_use]
    pub fn removal_threshold(mut self, threshold: u8) -> Self {
        self.config.removal_threshold = threshold;
        self
    }

    #[must_use]
    pub fn parallel_batch(mut self, parallel: bool) -> Self {
        self.config.parallel_batch = parallel;
        self
    }

    /// Build the processor configuration
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Config` for a zero-area or oversized canvas
    pub fn build(self) -> Result<ProcessorConfig> {
        self.config.canvas.validate()?;
        Ok(self.config)
    }
}

impl Default for ProcessorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the compositing pipeline for one canvas configuration
#[derive(Debug, Clone)]
pub struct StudioProcessor {
    config: ProcessorConfig,
    remover: BackgroundRemover,
    synthesizer: BackgroundSynthesizer,
    compositor: Compositor,
}

impl StudioProcessor {
    /// Create a processor
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Config` when the canvas is invalid
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.canvas.validate()?;
        Ok(Self {
            remover: BackgroundRemover::with_threshold(config.removal_threshold),
            synthesizer: BackgroundSynthesizer::new(),
            compositor: Compositor::new(),
            config,
        })
    }

    /// Processor for a bare canvas size with default settings
    pub fn with_canvas(canvas: CanvasSize) -> Result<Self> {
        Self::new(ProcessorConfig::builder().canvas(canvas).build()?)
    }

    #[must_use]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Render one source image
    ///
    /// # Errors
    ///
    /// - `StudioError::Config` for an invalid style
    /// - `StudioError::Processing` when any stage fails; no partial result is
    ///   returned
    #[instrument(
        skip(self, source, style),
        fields(
            canvas = %self.config.canvas,
            style = %style.background_style,
            source = %format!("{}x{}", source.width(), source.height())
        )
    )]
    pub fn process(&self, source: &DynamicImage, style: &StyleConfig) -> Result<RenderResult> {
        style.validate()?;
        let total_start = Instant::now();
        let mut timings = ProcessingTimings::default();

        trace_info!(
            lighting = %style.lighting_preset,
            grading = %style.color_grading,
            "Starting render"
        );

        let foreground = self.remove_background(source, style, &mut timings);
        let background = self.synthesize(style, &mut timings)?;
        self.finish(&foreground, style, background, timings, total_start)
    }

    /// Decode and render an encoded image (PNG, JPEG, TIFF, WebP)
    ///
    /// # Errors
    ///
    /// - `StudioError::Decode` when the bytes are not a readable image
    /// - Any error from [`StudioProcessor::process`]
    pub fn process_bytes(&self, bytes: &[u8], style: &StyleConfig) -> Result<RenderResult> {
        let source = decode_image(bytes)?;
        self.process(&source, style)
    }

    /// Render several sources against a single synthesized background
    ///
    /// The background is rendered once and every item composites onto its
    /// own copy. Results keep input order; the first failure fails the batch.
    ///
    /// # Errors
    ///
    /// Same as [`StudioProcessor::process`]
    #[instrument(skip(self, sources, style), fields(items = sources.len(), canvas = %self.config.canvas))]
    pub fn process_batch(
        &self,
        sources: &[DynamicImage],
        style: &StyleConfig,
    ) -> Result<Vec<RenderResult>> {
        style.validate()?;
        let batch_start = Instant::now();
        let mut shared = ProcessingTimings::default();
        let background = self.synthesize(style, &mut shared)?;

        let render = |source: &DynamicImage| {
            let item_start = Instant::now();
            let mut timings = shared.clone();
            let foreground = self.remove_background(source, style, &mut timings);
            self.finish(&foreground, style, background.clone(), timings, item_start)
        };

        let results = if self.config.parallel_batch {
            sources.par_iter().map(render).collect::<Result<Vec<_>>>()?
        } else {
            sources.iter().map(render).collect::<Result<Vec<_>>>()?
        };

        trace_info!(
            items = results.len(),
            elapsed_ms = batch_start.elapsed().as_millis() as u64,
            "Batch complete"
        );
        Ok(results)
    }

    fn remove_background<'a>(
        &self,
        source: &'a DynamicImage,
        style: &StyleConfig,
        timings: &mut ProcessingTimings,
    ) -> Cow<'a, DynamicImage> {
        if !style.remove_background {
            return Cow::Borrowed(source);
        }
        let _span = span!(
            Level::DEBUG,
            "background_removal",
            threshold = self.remover.threshold()
        )
        .entered();
        let start = Instant::now();
        let masked = self.remover.remove(source);
        timings.removal_ms = start.elapsed().as_millis() as u64;
        Cow::Owned(DynamicImage::ImageRgba8(masked))
    }

    fn synthesize(&self, style: &StyleConfig, timings: &mut ProcessingTimings) -> Result<RgbImage> {
        let _span = span!(Level::DEBUG, "synthesis", style = %style.background_style).entered();
        let start = Instant::now();
        let mut rng = match style.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let background = self
            .synthesizer
            .synthesize(self.config.canvas, style, &mut rng)?;
        timings.synthesis_ms = start.elapsed().as_millis() as u64;
        Ok(background)
    }

    /// Composite, effects and enhancement for one item
    fn finish(
        &self,
        foreground: &DynamicImage,
        style: &StyleConfig,
        background: RgbImage,
        mut timings: ProcessingTimings,
        total_start: Instant,
    ) -> Result<RenderResult> {
        let canvas = self.config.canvas;

        let mut image = {
            let _span = span!(Level::DEBUG, "composite").entered();
            let start = Instant::now();
            let composed = self.compositor.composite(foreground, background, canvas)?;
            timings.composite_ms = start.elapsed().as_millis() as u64;
            composed
        };

        {
            let _span = span!(Level::DEBUG, "effects").entered();
            let start = Instant::now();
            apply_effects(&mut image, style)?;
            timings.effects_ms = start.elapsed().as_millis() as u64;
        }

        {
            let _span = span!(Level::DEBUG, "post_processing", enhance = style.enhance).entered();
            let start = Instant::now();
            if style.enhance {
                run_stage("enhance", &Enhance::default(), &mut image)?;
            }
            image = resize_to(image, canvas, FilterType::Lanczos3);
            timings.post_ms = start.elapsed().as_millis() as u64;
        }

        timings.total_ms = total_start.elapsed().as_millis() as u64;
        trace_debug!(
            mean = ?mean_color(&image).0,
            timings = %timings.summary(),
            "Render complete"
        );

        Ok(RenderResult {
            image,
            canvas,
            timings,
        })
    }
}

/// Lighting, shadow, vignette and grading, each skipped when disabled
fn apply_effects(image: &mut RgbImage, style: &StyleConfig) -> Result<()> {
    if style.lighting_preset != LightingPreset::None {
        run_stage("lighting", &style.lighting_preset, image)?;
    }
    if style.shadow_enabled() {
        run_stage("shadow", &WindowShadow::new(style.shadow_intensity), image)?;
    }
    if style.vignette_enabled() {
        run_stage("vignette", &Vignette::centered(style.vignette_strength), image)?;
    }
    if style.color_grading != ColorGrading::Neutral {
        run_stage("grading", &style.color_grading, image)?;
    }
    Ok(())
}

fn run_stage(name: &str, effect: &dyn Effect, image: &mut RgbImage) -> Result<()> {
    trace_debug!(stage = name, "Applying effect");
    effect.apply(image).map_err(|e| match e {
        StudioError::Processing(details) => StudioError::processing_stage_error(
            name,
            &details,
            Some(&format!("{}x{}", image.width(), image.height())),
        ),
        other => other,
    })
}

/// Decode an encoded image, mapping failures to `StudioError::Decode`
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| StudioError::decode(format!("Failed to decode image from bytes: {}", e)))
}
