mod cli;
mod scenes;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::RenderSettings;
use lumen_renderer::{Camera, ImageBuffer, DEFAULT_BUCKET_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cli::Args;
use scenes::Scene;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let settings = settings_from(&args)?;
    if let Some(threads) = settings.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the render thread pool")?;
    }

    let seed = settings.seed.unwrap_or(0);
    let mut rng = StdRng::seed_from_u64(seed);
    let Scene {
        world,
        camera,
        aspect_ratio,
    } = scenes::build(args.scene, &mut rng)?;
    let mut camera = apply_settings(camera, aspect_ratio, &settings);

    if args.writes_stdout() && !args.parallel {
        // Each scanline is written as soon as it is traced
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        camera
            .render(world.as_ref(), &mut out)
            .context("Failed to write image to stdout")?;
        return Ok(());
    }

    let image = if args.parallel {
        camera.render_parallel(world.as_ref(), DEFAULT_BUCKET_SIZE)
    } else {
        camera.render_image(world.as_ref())
    };

    if args.writes_stdout() {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        image
            .write_ppm(&mut out)
            .context("Failed to write image to stdout")?;
    } else {
        save_image(&image, Path::new(&args.output))?;
    }

    Ok(())
}

/// Merge the settings file with command line flags, flags taking precedence.
fn settings_from(args: &Args) -> Result<RenderSettings> {
    let flags = RenderSettings {
        image_width: args.width,
        samples_per_pixel: args.samples,
        max_depth: args.depth,
        seed: args.seed,
        ..Default::default()
    };

    let file = match &args.settings {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };

    Ok(flags.or(file))
}

/// Override the scene's camera with whatever the settings specify.
fn apply_settings(camera: Camera, aspect_ratio: f32, settings: &RenderSettings) -> Camera {
    let mut camera = camera;

    if settings.image_width.is_some() || settings.aspect_ratio.is_some() {
        let width = settings.image_width.unwrap_or(camera.image_width);
        let ratio = settings.aspect_ratio.unwrap_or(aspect_ratio);
        camera = camera.with_aspect_ratio(width, ratio);
    }

    let samples = settings
        .samples_per_pixel
        .unwrap_or(camera.config.samples_per_pixel);
    let depth = settings.max_depth.unwrap_or(camera.config.max_depth);
    let seed = settings.seed.unwrap_or(camera.config.seed);

    camera.with_quality(samples, depth).with_seed(seed)
}

/// Write the image to a file, as PNG when the extension says so and PPM otherwise.
fn save_image(buffer: &ImageBuffer, path: &Path) -> Result<()> {
    let is_png = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        image::save_buffer(
            path,
            &buffer.to_rgb8(),
            buffer.width,
            buffer.height,
            image::ColorType::Rgb8,
        )
        .with_context(|| format!("Failed to save PNG to {}", path.display()))?;
    } else {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        buffer
            .write_ppm(&mut out)
            .with_context(|| format!("Failed to write PPM to {}", path.display()))?;
        out.flush()?;
    }

    log::info!("Saved {}", path.display());
    Ok(())
}
