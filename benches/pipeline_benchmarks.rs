use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use drisya_studio::{
    config::{BackgroundStyle, CanvasSize, ColorGrading, LightingPreset, QualityTier, StyleConfig},
    effects::{Effect, Enhance},
    processor::{ProcessorConfig, StudioProcessor},
    synthesis::BackgroundSynthesizer,
};
use image::{DynamicImage, Rgb, RgbImage};
use rand::{rngs::StdRng, SeedableRng};

fn product_shot() -> DynamicImage {
    let mut img = RgbImage::from_pixel(1200, 900, Rgb([245, 245, 245]));
    for y in 200..700 {
        for x in 300..900 {
            img.put_pixel(x, y, Rgb([120, 70, 40]));
        }
    }
    DynamicImage::ImageRgb8(img)
}

fn style(background_style: BackgroundStyle) -> StyleConfig {
    StyleConfig {
        background_style,
        background_prompt: Some("luxury purple".to_string()),
        seed: Some(42),
        ..StyleConfig::default()
    }
}

fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("background_synthesis");
    group.sample_size(10);

    let synthesizer = BackgroundSynthesizer::new();
    let canvas = QualityTier::Standard.canvas_size();

    for background_style in [
        BackgroundStyle::Gradient,
        BackgroundStyle::Velvet,
        BackgroundStyle::Marble,
        BackgroundStyle::Festive,
        BackgroundStyle::Textured,
    ] {
        let style = style(background_style);
        group.bench_with_input(
            BenchmarkId::new("synthesize", background_style.to_string()),
            &style,
            |b, style| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(42);
                    black_box(synthesizer.synthesize(canvas, style, &mut rng))
                });
            },
        );
    }

    group.finish();
}

fn bench_enhance(c: &mut Criterion) {
    let mut group = c.benchmark_group("enhance");
    group.sample_size(10);

    let canvas = CanvasSize::square(1080);
    let base = RgbImage::from_fn(canvas.width, canvas.height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });

    group.bench_function("enhance_1080", |b| {
        b.iter(|| {
            let mut image = base.clone();
            black_box(Enhance::default().apply(&mut image))
        });
    });

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(10);

    let source = product_shot();
    let style = StyleConfig {
        lighting_preset: LightingPreset::SoftGlow,
        shadow_intensity: 0.4,
        vignette_strength: 0.25,
        color_grading: ColorGrading::Luxury,
        ..style(BackgroundStyle::Velvet)
    };

    for tier in [QualityTier::Standard, QualityTier::Hd, QualityTier::UltraHd] {
        let Ok(config) = ProcessorConfig::builder().quality(tier).build() else {
            continue;
        };
        let Ok(processor) = StudioProcessor::new(config) else {
            continue;
        };
        group.bench_with_input(
            BenchmarkId::new("velvet_luxury", tier.canvas_size().to_string()),
            &processor,
            |b, processor| {
                b.iter(|| black_box(processor.process(&source, &style)));
            },
        );
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_processing");
    group.sample_size(10);

    let sources: Vec<DynamicImage> = (0..4).map(|_| product_shot()).collect();
    let style = style(BackgroundStyle::Marble);

    for parallel in [false, true] {
        let Ok(config) = ProcessorConfig::builder().parallel_batch(parallel).build() else {
            continue;
        };
        let Ok(processor) = StudioProcessor::new(config) else {
            continue;
        };
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_with_input(
            BenchmarkId::new("batch_4", label),
            &processor,
            |b, processor| {
                b.iter(|| black_box(processor.process_batch(&sources, &style)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_synthesis,
    bench_enhance,
    bench_full_pipeline,
    bench_batch
);
criterion_main!(benches);
