mod cli;
mod config;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rtc_core::Scene;
use rtc_renderer::{Frame, Framebuffer, RenderPool, RenderSettings};

use crate::cli::{init_logger, Args};
use crate::config::RenderConfig;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => {
            info!("No config given, rendering the demo scene");
            RenderConfig::default()
        }
    };
    config.apply_args(&args);

    run(&config)
}

fn run(config: &RenderConfig) -> Result<()> {
    let (width, height) = (config.width, config.height);
    info!(
        "Image resolution: {}x{}, {}x{} samples per pixel, {} bounces",
        width,
        height,
        config.settings.supersamples,
        config.settings.supersamples,
        config.settings.max_bounces
    );

    let scene = Arc::new(Scene::from_description(&config.scene).context("Invalid scene")?);

    let mut pool = match config.threads {
        Some(threads) => RenderPool::new(width, height, threads)?,
        None => RenderPool::with_default_threads(width, height)?,
    };
    let mut framebuffer = Framebuffer::new(width, height, config.settings.pixel_format);

    let frames = config.frames.max(1);
    let total = Instant::now();
    for index in 0..frames {
        let camera = config.camera_for_frame(index).build(width, height)?;
        let settings = RenderSettings {
            seed: config.settings.seed.wrapping_add(u64::from(index)),
            ..config.settings
        };
        let frame = Frame::new(Arc::clone(&scene), camera, settings, width, height)?;

        let start = Instant::now();
        pool.render_frame(Arc::new(frame), &mut framebuffer)?;
        info!(
            "Frame {}/{} done in {:.2}s",
            index + 1,
            frames,
            start.elapsed().as_secs_f64()
        );
    }
    info!(
        "Rendered {} frames on {} threads in {:.2}s",
        frames,
        pool.thread_count(),
        total.elapsed().as_secs_f64()
    );

    save(&framebuffer, &config.output)
}

fn save(framebuffer: &Framebuffer, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        &framebuffer.to_rgba8(),
        framebuffer.width(),
        framebuffer.height(),
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Saved {}", path.display());
    Ok(())
}
