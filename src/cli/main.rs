//! Product photo studio CLI
//!
//! Command-line interface that composites product photos onto synthesized
//! studio backgrounds.

use super::config::CliConfigBuilder;
use crate::{
    config::{QualityTier, StyleConfig},
    processor::StudioProcessor,
    services::{ImageIOService, OutputFormat},
    tracing_config::{init_cli_tracing, spans, TracingFormat},
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Product photo studio compositing tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "drisya-studio")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image files or directories
    #[arg(value_name = "INPUT", required = true)]
    pub input: Vec<String>,

    /// Output file (single input) or directory (multiple inputs)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CliOutputFormat::Png)]
    pub format: CliOutputFormat,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = OutputFormat::JPEG_QUALITY)]
    pub jpeg_quality: u8,

    /// Style configuration JSON file; flags below override its fields
    #[arg(short, long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// Start from the basic variant: a darkened prompt gradient with no effects
    #[arg(long, conflicts_with = "style")]
    pub basic: bool,

    /// Background style (gradient, velvet, marble, minimal, festive, textured)
    #[arg(short, long)]
    pub background: Option<String>,

    /// Comma-separated hex colors for the background
    #[arg(long, value_delimiter = ',')]
    pub colors: Vec<String>,

    /// Free-text background description used when no colors are given
    #[arg(long)]
    pub prompt: Option<String>,

    /// Lighting preset (moody, soft-glow, spotlight, studio, none)
    #[arg(long)]
    pub lighting: Option<String>,

    /// Window shadow intensity (0.0-1.0)
    #[arg(long)]
    pub shadow: Option<f32>,

    /// Vignette strength (0.0-1.0)
    #[arg(long)]
    pub vignette: Option<f32>,

    /// Color grading (warm, cool, dramatic, luxury, neutral)
    #[arg(long)]
    pub grading: Option<String>,

    /// Keep the source background instead of stripping light pixels
    #[arg(long)]
    pub keep_background: bool,

    /// Skip the final enhancement pass
    #[arg(long)]
    pub no_enhance: bool,

    /// Output quality tier
    #[arg(short, long, value_enum, default_value_t = CliQuality::Standard)]
    pub quality: CliQuality,

    /// Background removal threshold; pixels brighter on every channel are cleared
    #[arg(long, default_value_t = crate::removal::DEFAULT_THRESHOLD)]
    pub threshold: u8,

    /// Seed for background textures (random when unset)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render all inputs against one shared background
    #[arg(long)]
    pub shared_background: bool,

    /// Number of threads (0 = rayon default, 1 = sequential)
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = CliLogFormat::Console)]
    pub log_format: CliLogFormat,

    /// Log filter directives (e.g. "drisya_studio=debug"), replacing -v and RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Process directory recursively
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Jpeg,
    #[cfg(feature = "webp-support")]
    Webp,
    Tiff,
}

impl CliOutputFormat {
    fn to_output_format(self, jpeg_quality: u8) -> OutputFormat {
        match self {
            Self::Png => OutputFormat::Png,
            Self::Jpeg => OutputFormat::Jpeg(jpeg_quality),
            #[cfg(feature = "webp-support")]
            Self::Webp => OutputFormat::WebP,
            Self::Tiff => OutputFormat::Tiff,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            #[cfg(feature = "webp-support")]
            Self::Webp => "webp",
            Self::Tiff => "tiff",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliLogFormat {
    /// Colored human-readable lines
    Console,
    /// Plain lines for CI logs
    Compact,
    /// One JSON object per event
    #[cfg(feature = "tracing-json")]
    Json,
}

impl From<CliLogFormat> for TracingFormat {
    fn from(format: CliLogFormat) -> Self {
        match format {
            CliLogFormat::Console => Self::Console,
            CliLogFormat::Compact => Self::Compact,
            #[cfg(feature = "tracing-json")]
            CliLogFormat::Json => Self::Json,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliQuality {
    /// 1080x1080
    Standard,
    /// 1920x1920
    Hd,
    /// 2160x2160
    #[value(name = "4k")]
    UltraHd,
}

impl From<CliQuality> for QualityTier {
    fn from(quality: CliQuality) -> Self {
        match quality {
            CliQuality::Standard => Self::Standard,
            CliQuality::Hd => Self::Hd,
            CliQuality::UltraHd => Self::UltraHd,
        }
    }
}

/// Where and how one input's render is written
#[derive(Debug, Clone)]
struct RenderJob {
    input: PathBuf,
    output: PathBuf,
    format: OutputFormat,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(
        cli.verbose,
        cli.log_format.into(),
        cli.log_filter.as_deref(),
    )
    .context("Failed to initialize tracing")?;

    let style = CliConfigBuilder::style_from_cli(&cli).context("Invalid style configuration")?;
    let processor_config = CliConfigBuilder::processor_config_from_cli(&cli)
        .context("Invalid processor configuration")?;

    if cli.threads > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let processor = StudioProcessor::new(processor_config)?;

    info!("Starting studio render");
    info!("Input(s): {}", cli.input.join(", "));
    info!(
        "Canvas: {}, background: {}, lighting: {}, grading: {}",
        processor.config().canvas,
        style.background_style,
        style.lighting_preset,
        style.color_grading
    );

    let start_time = Instant::now();
    let jobs = plan_jobs(&cli)?;
    if jobs.is_empty() {
        warn!("No supported image files found in the provided inputs");
        return Ok(());
    }

    let processed = if cli.shared_background && jobs.len() > 1 {
        render_shared(&processor, &style, &jobs)?
    } else {
        render_each(&processor, &style, &jobs)
    };

    let elapsed = start_time.elapsed();
    info!(
        "Rendered {}/{} image(s) in {:.2}s",
        processed,
        jobs.len(),
        elapsed.as_secs_f64()
    );

    if processed < jobs.len() {
        anyhow::bail!("{} image(s) failed to render", jobs.len() - processed);
    }
    Ok(())
}

/// Resolve inputs to files and pair each with its output path
fn plan_jobs(cli: &Cli) -> Result<Vec<RenderJob>> {
    let mut files = Vec::new();

    for input in &cli.input {
        let path = PathBuf::from(input);

        if path.is_file() {
            if ImageIOService::is_supported_format(&path) {
                files.push(path);
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            files.extend(find_image_files(&path, cli.recursive)?);
        } else {
            anyhow::bail!(
                "Input path does not exist or is not accessible: {}",
                path.display()
            );
        }
    }

    files.sort();
    info!("Found {} image file(s) to process", files.len());

    let single_output = match (&cli.output, files.len()) {
        (Some(output), 1) if Path::new(output).extension().is_some() => Some(PathBuf::from(output)),
        _ => None,
    };
    let output_dir = match (&cli.output, &single_output) {
        (Some(output), None) => {
            let output_path = PathBuf::from(output);
            if output_path.is_file() {
                anyhow::bail!(
                    "Output path exists and is a file, not a directory: {}",
                    output_path.display()
                );
            }
            Some(output_path)
        },
        _ => None,
    };

    // a named output file picks its own format from the extension
    let format = match &single_output {
        Some(output) => match OutputFormat::from_path(output) {
            OutputFormat::Jpeg(_) => OutputFormat::Jpeg(cli.jpeg_quality),
            other => other,
        },
        None => cli.format.to_output_format(cli.jpeg_quality),
    };

    Ok(files
        .into_iter()
        .map(|input| {
            let output = single_output.clone().unwrap_or_else(|| {
                generate_output_path(&input, output_dir.as_deref(), cli.format.extension())
            });
            RenderJob {
                input,
                output,
                format,
            }
        })
        .collect())
}

fn progress_bar(len: usize) -> Option<ProgressBar> {
    if len <= 1 {
        return None;
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    Some(pb)
}

/// Render inputs one by one, each with its own background; failures are
/// logged and counted rather than aborting the run
fn render_each(processor: &StudioProcessor, style: &StyleConfig, jobs: &[RenderJob]) -> usize {
    let pb = progress_bar(jobs.len());
    let mut processed = 0;

    for job in jobs {
        if let Some(ref pb) = pb {
            pb.set_message(format!("Rendering {}", job.input.display()));
        }

        let span = spans::file_processing(&job.input, &style.background_style.to_string());
        let _guard = span.enter();

        match render_file(processor, style, job) {
            Ok(()) => processed += 1,
            Err(e) => error!("Failed to render {}: {:#}", job.input.display(), e),
        }

        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }
    processed
}

fn render_file(processor: &StudioProcessor, style: &StyleConfig, job: &RenderJob) -> Result<()> {
    let source = ImageIOService::load_image(&job.input)
        .with_context(|| format!("Failed to load {}", job.input.display()))?;
    let result = processor.process(&source, style)?;
    debug!(timings = %result.timings.summary(), "Render timings");
    ImageIOService::save_image(&result.image, &job.output, job.format)?;
    info!("{} -> {}", job.input.display(), job.output.display());
    Ok(())
}

/// Render every input against one synthesized background
///
/// All sources are decoded up front; a single unreadable input fails the run.
fn render_shared(
    processor: &StudioProcessor,
    style: &StyleConfig,
    jobs: &[RenderJob],
) -> Result<usize> {
    let span = spans::batch_processing(jobs.len());
    let _guard = span.enter();

    let sources = jobs
        .iter()
        .map(|job| {
            ImageIOService::load_image(&job.input)
                .with_context(|| format!("Failed to load {}", job.input.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let results = processor.process_batch(&sources, style)?;

    let pb = progress_bar(jobs.len());
    for (job, result) in jobs.iter().zip(&results) {
        if let Some(ref pb) = pb {
            pb.set_message(format!("Saving {}", job.output.display()));
        }
        ImageIOService::save_image(&result.image, &job.output, job.format)?;
        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(results.len())
}

fn find_image_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if recursive {
        for entry in walkdir::WalkDir::new(dir) {
            let entry = entry?;
            if entry.file_type().is_file() && ImageIOService::is_supported_format(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    } else {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_file() && ImageIOService::is_supported_format(&path) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// `<stem>_studio.<ext>` next to the input, or inside `output_dir` when given
fn generate_output_path(input_path: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let dir = output_dir
        .or_else(|| input_path.parent())
        .unwrap_or(Path::new("."));
    dir.join(format!("{}_studio.{}", stem.to_string_lossy(), extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generate_output_path() {
        let output = generate_output_path(Path::new("/path/to/shoe.jpg"), None, "png");
        assert_eq!(output, Path::new("/path/to/shoe_studio.png"));

        let output = generate_output_path(
            Path::new("/path/to/my.complex.name.jpeg"),
            Some(Path::new("out")),
            "jpg",
        );
        assert_eq!(output, Path::new("out/my.complex.name_studio.jpg"));

        let output = generate_output_path(Path::new("no_ext"), None, "tiff");
        assert_eq!(output.file_name().unwrap(), "no_ext_studio.tiff");
    }

    #[test]
    fn test_find_image_files() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(temp_dir.path().join("a.png"), b"").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(nested.join("b.JPG"), b"").unwrap();

        let flat = find_image_files(temp_dir.path(), false).unwrap();
        assert_eq!(flat.len(), 1);

        let mut deep = find_image_files(temp_dir.path(), true).unwrap();
        deep.sort();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_plan_jobs_single_output_file() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("watch.png");
        std::fs::write(&input, b"").unwrap();
        let target = temp_dir.path().join("hero.jpg");

        let cli = Cli::parse_from([
            "drisya-studio",
            input.to_str().unwrap(),
            "-o",
            target.to_str().unwrap(),
        ]);
        let jobs = plan_jobs(&cli).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].output, target);
        assert_eq!(jobs[0].format, OutputFormat::Jpeg(OutputFormat::JPEG_QUALITY));
    }

    #[test]
    fn test_output_extension_overrides_format_flag() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("ring.png");
        std::fs::write(&input, b"").unwrap();

        let cli = Cli::parse_from([
            "drisya-studio",
            input.to_str().unwrap(),
            "-o",
            temp_dir.path().join("ring.jpeg").to_str().unwrap(),
            "--format",
            "png",
            "--jpeg-quality",
            "70",
        ]);
        assert_eq!(plan_jobs(&cli).unwrap()[0].format, OutputFormat::Jpeg(70));

        let cli = Cli::parse_from([
            "drisya-studio",
            input.to_str().unwrap(),
            "-o",
            temp_dir.path().join("ring.tif").to_str().unwrap(),
        ]);
        assert_eq!(plan_jobs(&cli).unwrap()[0].format, OutputFormat::Tiff);
    }

    #[test]
    fn test_plan_jobs_directory_output() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("b.png"), b"").unwrap();
        std::fs::write(temp_dir.path().join("a.png"), b"").unwrap();
        let out_dir = temp_dir.path().join("renders");

        let cli = Cli::parse_from([
            "drisya-studio",
            temp_dir.path().to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--format",
            "jpeg",
        ]);
        let jobs = plan_jobs(&cli).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].output, out_dir.join("a_studio.jpg"));
        assert_eq!(jobs[1].output, out_dir.join("b_studio.jpg"));
        assert!(jobs
            .iter()
            .all(|job| job.format == OutputFormat::Jpeg(OutputFormat::JPEG_QUALITY)));
    }

    #[test]
    fn test_missing_input_is_error() {
        let cli = Cli::parse_from(["drisya-studio", "/definitely/not/here.png"]);
        assert!(plan_jobs(&cli).is_err());
    }

    #[test]
    fn test_log_format_flag() {
        let cli = Cli::parse_from(["drisya-studio", "in.png"]);
        assert_eq!(TracingFormat::from(cli.log_format), TracingFormat::Console);
        assert!(cli.log_filter.is_none());

        let cli = Cli::parse_from([
            "drisya-studio",
            "in.png",
            "--log-format",
            "compact",
            "--log-filter",
            "drisya_studio=debug",
        ]);
        assert_eq!(TracingFormat::from(cli.log_format), TracingFormat::Compact);
        assert_eq!(cli.log_filter.as_deref(), Some("drisya_studio=debug"));

        #[cfg(feature = "tracing-json")]
        {
            let cli = Cli::parse_from(["drisya-studio", "in.png", "--log-format", "json"]);
            assert_eq!(TracingFormat::from(cli.log_format), TracingFormat::Json);
        }
    }

    #[test]
    fn test_cli_quality_mapping() {
        assert_eq!(QualityTier::from(CliQuality::UltraHd), QualityTier::UltraHd);
        assert_eq!(CliOutputFormat::Jpeg.to_output_format(80), OutputFormat::Jpeg(80));
        assert_eq!(CliOutputFormat::Tiff.extension(), "tiff");
    }

    #[test]
    fn test_render_file_end_to_end() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("mug.png");
        image::RgbImage::from_pixel(40, 30, image::Rgb([120, 60, 30]))
            .save(&input)
            .unwrap();
        let job = RenderJob {
            input,
            output: temp_dir.path().join("out").join("mug_studio.png"),
            format: OutputFormat::Png,
        };
        let processor =
            StudioProcessor::with_canvas(crate::config::CanvasSize::new(64, 48)).unwrap();
        let style = StyleConfig::builder().seed(1).build().unwrap();

        render_file(&processor, &style, &job).unwrap();
        let rendered = ImageIOService::load_image(&job.output).unwrap();
        assert_eq!((rendered.width(), rendered.height()), (64, 48));
    }
}
