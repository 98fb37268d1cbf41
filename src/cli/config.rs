//! Conversion from CLI arguments to pipeline configuration

use crate::cli::main_impl::Cli;
use crate::{
    config::{BackgroundStyle, ColorGrading, LightingPreset, StyleConfig},
    processor::{ProcessorConfig, ProcessorConfigBuilder},
};
use anyhow::{Context, Result};
use std::path::Path;

/// Builds `StyleConfig` and `ProcessorConfig` from parsed arguments
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Style from the optional `--style` JSON file, then per-field flags on top
    pub(crate) fn style_from_cli(cli: &Cli) -> Result<StyleConfig> {
        let mut style = match &cli.style {
            Some(path) => Self::load_style_file(path)?,
            None if cli.basic => StyleConfig::basic(cli.prompt.clone().unwrap_or_default()),
            None => StyleConfig::default(),
        };

        if let Some(background) = &cli.background {
            style.background_style = BackgroundStyle::from_name(background);
        }
        if !cli.colors.is_empty() {
            style.gradient_colors.clone_from(&cli.colors);
        }
        if let Some(prompt) = &cli.prompt {
            style.background_prompt = Some(prompt.clone());
        }
        if let Some(lighting) = &cli.lighting {
            style.lighting_preset = LightingPreset::from_name(lighting);
        }
        if let Some(shadow) = cli.shadow {
            style.shadow_intensity = shadow;
        }
        if let Some(vignette) = cli.vignette {
            style.vignette_strength = vignette;
        }
        if let Some(grading) = &cli.grading {
            style.color_grading = ColorGrading::from_name(grading);
        }
        if cli.keep_background {
            style.remove_background = false;
        }
        if cli.no_enhance {
            style.enhance = false;
        }
        if cli.seed.is_some() {
            style.seed = cli.seed;
        }

        style.validate()?;
        log::debug!("Resolved style: {:?}", style);
        Ok(style)
    }

    pub(crate) fn processor_config_from_cli(cli: &Cli) -> Result<ProcessorConfig> {
        let config = ProcessorConfigBuilder::new()
            .quality(cli.quality.into())
            .removal_threshold(cli.threshold)
            .parallel_batch(cli.threads != 1)
            .build()?;
        Ok(config)
    }

    fn load_style_file(path: &Path) -> Result<StyleConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read style file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse style file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_flags_override_style_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"backgroundStyle": "marble", "gradientColors": ["#101010"], "vignetteStrength": 0.2}}"##
        )
        .unwrap();

        let cli = Cli::parse_from([
            "drisya-studio",
            "in.png",
            "--style",
            file.path().to_str().unwrap(),
            "--lighting",
            "soft_glow",
            "--vignette",
            "0.4",
            "--no-enhance",
        ]);
        let style = CliConfigBuilder::style_from_cli(&cli).unwrap();

        assert_eq!(style.background_style, BackgroundStyle::Marble);
        assert_eq!(style.gradient_colors, vec!["#101010".to_string()]);
        assert_eq!(style.lighting_preset, LightingPreset::SoftGlow);
        assert!((style.vignette_strength - 0.4).abs() < f32::EPSILON);
        assert!(!style.enhance);
        assert!(style.remove_background);
    }

    #[test]
    fn test_colors_are_comma_separated() {
        let cli = Cli::parse_from(["drisya-studio", "in.png", "--colors", "#000000,#ffffff"]);
        let style = CliConfigBuilder::style_from_cli(&cli).unwrap();
        assert_eq!(style.gradient_colors.len(), 2);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = Cli::parse_from(["drisya-studio", "in.png", "--shadow", "3.0"]);
        assert!(CliConfigBuilder::style_from_cli(&cli).is_err());
    }

    #[test]
    fn test_basic_flag_uses_darkened_default_prompt() {
        let cli = Cli::parse_from(["drisya-studio", "in.png", "--basic"]);
        let style = CliConfigBuilder::style_from_cli(&cli).unwrap();
        assert_eq!(
            style.background_prompt.as_deref(),
            Some(StyleConfig::DEFAULT_BASIC_PROMPT)
        );
        assert!((style.background_brightness - 0.9).abs() < f64::EPSILON);
        assert!(!style.enhance);

        let cli = Cli::parse_from(["drisya-studio", "in.png", "--basic", "--prompt", "rose"]);
        let style = CliConfigBuilder::style_from_cli(&cli).unwrap();
        assert_eq!(style.background_prompt.as_deref(), Some("rose"));
    }

    #[test]
    fn test_quality_sets_canvas() {
        let cli = Cli::parse_from(["drisya-studio", "in.png", "--quality", "4k"]);
        let config = CliConfigBuilder::processor_config_from_cli(&cli).unwrap();
        assert_eq!(config.canvas.dimensions(), (2160, 2160));
    }
}
