//! Serializable scene descriptions.
//!
//! These are the on-disk (JSON) form of a scene; [`Scene::from_description`]
//! validates them into the packed runtime form.
//!
//! [`Scene::from_description`]: crate::Scene::from_description

use rtc_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::{Color, Material};

fn default_specular() -> f32 {
    0.5
}

fn default_ior() -> f32 {
    1.5
}

/// A material, either from a preset or with every parameter spelled out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaterialDescription {
    Metal {
        albedo: Color,
        roughness: f32,
        #[serde(default)]
        emissive: f32,
    },
    Dielectric {
        albedo: Color,
        roughness: f32,
        #[serde(default = "default_specular")]
        specular: f32,
        #[serde(default = "default_ior")]
        ior: f32,
        #[serde(default)]
        emissive: f32,
    },
    Principled(Material),
}

impl MaterialDescription {
    pub fn to_material(&self) -> Material {
        match *self {
            MaterialDescription::Metal {
                albedo,
                roughness,
                emissive,
            } => Material::metal(albedo, roughness).with_emissive(emissive),
            MaterialDescription::Dielectric {
                albedo,
                roughness,
                specular,
                ior,
                emissive,
            } => Material::dielectric(albedo, specular, roughness, ior).with_emissive(emissive),
            MaterialDescription::Principled(material) => material,
        }
    }
}

/// A sphere and the index of its material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: Vec3,
    pub radius: f32,
    #[serde(default)]
    pub material: u32,
}

/// Everything needed to build a [`Scene`](crate::Scene).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Radiance returned by rays that escape the scene
    pub sky: Color,
    pub materials: Vec<MaterialDescription>,
    pub spheres: Vec<SphereDescription>,
}
