//! Path integration.
//!
//! Each path picks one of the two lobes per bounce with equal probability
//! and compensates by doubling the throughput. Every pixel draws from its own
//! RNG stream, seeded from the frame seed and the pixel coordinates, so the
//! result does not depend on which thread renders it or in what order.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rtc_core::{Color, Scene};
use rtc_math::{Intersection, Ray, Vec2};
use serde::{Deserialize, Serialize};

use crate::band::{render_band, Band};
use crate::shading::{evaluate_diffuse, evaluate_specular};
use crate::{Camera, Framebuffer, PixelFormat, RenderError, RenderResult};

/// Per-frame integration settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Jittered sub-samples per pixel axis (`n * n` per pixel)
    pub supersamples: u32,
    /// Bounces after the primary hit
    pub max_bounces: u32,
    pub seed: u64,
    pub pixel_format: PixelFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            supersamples: 4,
            max_bounces: 4,
            seed: 0,
            pixel_format: PixelFormat::default(),
        }
    }
}

/// Everything a worker needs to render part of a frame.
///
/// Immutable once built; shared between workers through an `Arc`.
#[derive(Debug, Clone)]
pub struct Frame {
    pub scene: Arc<Scene>,
    pub camera: Camera,
    pub settings: RenderSettings,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(
        scene: Arc<Scene>,
        camera: Camera,
        settings: RenderSettings,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyViewport { width, height });
        }
        Ok(Self {
            scene,
            camera,
            settings,
            width,
            height,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Closest hit of the ray through the centre of pixel `(x, y)`.
pub fn trace_primary(
    scene: &Scene,
    camera: &Camera,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> RenderResult<Intersection> {
    let ray = camera.generate_ray(x, y, width, height, 0.5, 0.5)?;
    Ok(scene.intersect(&ray))
}

/// Radiance carried back along `ray`, following at most `max_bounces`
/// bounces after the first hit.
pub fn trace_path<R: Rng + ?Sized>(
    scene: &Scene,
    ray: Ray,
    max_bounces: u32,
    rng: &mut R,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = ray;

    for depth in 0..=max_bounces {
        let hit = scene.intersect(&ray);

        let Some(object) = hit.object() else {
            radiance += throughput * scene.sky();
            break;
        };

        let (Some(sphere), Some(material)) =
            (scene.spheres().get(object), scene.material_for(object))
        else {
            log::warn!("hit object {object} has no sphere or material");
            break;
        };

        let position = ray.at(hit.hit_t);
        let mut normal = sphere.normal_at(position);
        if normal.dot(ray.direction) > 0.0 {
            normal = -normal;
        }

        radiance += throughput * material.albedo * material.emissive;

        if depth == max_bounces {
            break;
        }

        let xi = Vec2::new(rng.gen(), rng.gen());
        let bounce = if rng.gen::<f32>() < 0.5 {
            evaluate_specular(xi, material, &ray, position, normal, normal)
        } else {
            evaluate_diffuse(xi, material, &ray, position, normal, normal)
        };

        if bounce.ray.is_terminated() {
            break;
        }

        throughput *= bounce.weight * 2.0;
        ray = bounce.ray;
    }

    radiance
}

/// Seed of the RNG stream for pixel `(x, y)` (SplitMix64 finalizer).
fn pixel_seed(seed: u64, x: u32, y: u32) -> u64 {
    let mut z = seed
        .wrapping_add((u64::from(y) << 32 | u64::from(x)).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Average linear radiance over the stratified sub-samples of pixel `(x, y)`.
pub fn render_pixel(frame: &Frame, x: u32, y: u32) -> RenderResult<Color> {
    let settings = &frame.settings;
    let samples = settings.supersamples.max(1);
    let step = 1.0 / samples as f32;

    let mut rng = StdRng::seed_from_u64(pixel_seed(settings.seed, x, y));
    let mut sum = Color::ZERO;

    for sy in 0..samples {
        for sx in 0..samples {
            let jitter_x = (sx as f32 + rng.gen::<f32>()) * step;
            let jitter_y = (sy as f32 + rng.gen::<f32>()) * step;
            let ray = frame
                .camera
                .generate_ray(x, y, frame.width, frame.height, jitter_x, jitter_y)?;
            sum += trace_path(&frame.scene, ray, settings.max_bounces, &mut rng);
        }
    }

    Ok(sum / (samples * samples) as f32)
}

fn prepare(frame: &Frame, framebuffer: &mut Framebuffer) -> RenderResult<()> {
    if framebuffer.width() != frame.width || framebuffer.height() != frame.height {
        return Err(RenderError::FramebufferMismatch {
            expected: frame.pixel_count(),
            actual: framebuffer.pixels().len(),
        });
    }
    framebuffer.set_format(frame.settings.pixel_format);
    Ok(())
}

/// Render the whole frame on the calling thread.
pub fn render(frame: &Frame, framebuffer: &mut Framebuffer) -> RenderResult<()> {
    prepare(frame, framebuffer)?;
    let band = Band::new(0, 0, frame.height);
    render_band(frame, &band, framebuffer.pixels_mut())
}

/// Render the whole frame with one rayon task per row.
pub fn render_parallel(frame: &Frame, framebuffer: &mut Framebuffer) -> RenderResult<()> {
    prepare(frame, framebuffer)?;
    let width = frame.width as usize;

    framebuffer
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .try_for_each(|(y, row)| {
            let band = Band::new(y, y as u32, 1);
            render_band(frame, &band, row)
        })
}
