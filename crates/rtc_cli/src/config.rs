//! Render configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rtc_core::{Color, MaterialDescription, SceneDescription, SphereDescription};
use rtc_math::Vec3;
use rtc_renderer::{unpack_srgba8, CameraDescription, RenderSettings};
use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Sky of the demo scene, 8-bit sRGB with R in the lowest byte.
const DEMO_SKY: u32 = 0xFF00_80FF;

/// Everything needed for one run of the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Worker threads; `None` uses every logical core
    pub threads: Option<usize>,
    pub frames: u32,
    /// Camera yaw added per frame, in degrees
    pub yaw_step: f32,
    pub camera: CameraDescription,
    pub settings: RenderSettings,
    pub scene: SceneDescription,
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            threads: None,
            frames: 1,
            yaw_step: 0.0,
            camera: CameraDescription {
                rotation: Vec3::new(0.0, -90.0, 0.0),
                ..CameraDescription::default()
            },
            settings: RenderSettings::default(),
            scene: demo_scene(),
            output: PathBuf::from("output.bmp"),
        }
    }
}

impl RenderConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(output) = &args.output {
            self.output = output.clone();
        }
        if let Some(width) = args.width {
            self.width = width;
        }
        if let Some(height) = args.height {
            self.height = height;
        }
        if let Some(threads) = args.threads {
            self.threads = Some(threads);
        }
        if let Some(frames) = args.frames {
            self.frames = frames;
        }
    }

    /// Camera of frame `index`, turned by `yaw_step` per frame.
    pub fn camera_for_frame(&self, index: u32) -> CameraDescription {
        let mut camera = self.camera;
        camera.rotation.y += self.yaw_step * index as f32;
        camera
    }
}

/// Four unit spheres in a diamond in front of a camera looking down +X.
pub fn demo_scene() -> SceneDescription {
    SceneDescription {
        sky: unpack_srgba8(DEMO_SKY).truncate(),
        materials: vec![
            MaterialDescription::Dielectric {
                albedo: Color::splat(0.8),
                roughness: 0.5,
                specular: 0.5,
                ior: 1.5,
                emissive: 0.0,
            },
            MaterialDescription::Metal {
                albedo: Color::new(1.0, 0.78, 0.34),
                roughness: 0.25,
                emissive: 0.0,
            },
            MaterialDescription::Dielectric {
                albedo: Color::new(0.8, 0.1, 0.1),
                roughness: 0.1,
                specular: 0.5,
                ior: 1.5,
                emissive: 0.0,
            },
            MaterialDescription::Dielectric {
                albedo: Color::ONE,
                roughness: 1.0,
                specular: 0.5,
                ior: 1.5,
                emissive: 2.0,
            },
        ],
        spheres: vec![
            SphereDescription {
                center: Vec3::new(5.0, -2.0, 0.0),
                radius: 1.0,
                material: 0,
            },
            SphereDescription {
                center: Vec3::new(5.0, 0.0, -2.0),
                radius: 1.0,
                material: 1,
            },
            SphereDescription {
                center: Vec3::new(5.0, 0.0, 2.0),
                radius: 1.0,
                material: 2,
            },
            SphereDescription {
                center: Vec3::new(5.0, 2.0, 0.0),
                radius: 1.0,
                material: 3,
            },
        ],
    }
}
