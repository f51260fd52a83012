//! Sphere scenes with packed material assignments.

use std::path::Path;

use rtc_math::{Intersection, MathError, Ray, Sphere};
use thiserror::Error;

use crate::packed::{PackError, PackedIndices, PACKED_MAX};
use crate::{Color, Material, SceneDescription};

/// Errors that can occur while building or loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("sphere {index} is invalid: {source}")]
    InvalidSphere { index: usize, source: MathError },

    #[error("material index {index} is out of range ({count} materials)")]
    MaterialIndexOutOfRange { index: u32, count: usize },

    #[error("scene cannot hold more than {0} materials")]
    TooManyMaterials(usize),

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// An unordered list of spheres, each with a material, plus sky radiance.
///
/// There is no acceleration structure: every ray is tested against every
/// sphere.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    material_ids: PackedIndices,
    materials: Vec<Material>,
    sky: Color,
}

impl Scene {
    /// Create an empty scene with the given sky radiance.
    pub fn new(sky: Color) -> Self {
        Self {
            sky,
            ..Default::default()
        }
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: Material) -> SceneResult<u32> {
        let index = self.materials.len();
        if index > PACKED_MAX as usize {
            return Err(SceneError::TooManyMaterials(PACKED_MAX as usize + 1));
        }
        self.materials.push(material);
        Ok(index as u32)
    }

    /// Add a sphere using a previously added material; returns the sphere's
    /// object id.
    pub fn add_sphere(&mut self, sphere: Sphere, material: u32) -> SceneResult<u32> {
        if material as usize >= self.materials.len() {
            return Err(SceneError::MaterialIndexOutOfRange {
                index: material,
                count: self.materials.len(),
            });
        }

        self.material_ids.push(material)?;
        self.spheres.push(sphere);
        Ok((self.spheres.len() - 1) as u32)
    }

    /// Validate and pack a description.
    pub fn from_description(desc: &SceneDescription) -> SceneResult<Self> {
        let mut scene = Scene::new(desc.sky);

        for material in &desc.materials {
            scene.add_material(material.to_material())?;
        }

        for (index, sphere) in desc.spheres.iter().enumerate() {
            let packed = Sphere::new(sphere.center, sphere.radius)
                .map_err(|source| SceneError::InvalidSphere { index, source })?;
            scene.add_sphere(packed, sphere.material)?;
        }

        log::debug!(
            "Built scene with {} spheres and {} materials",
            scene.sphere_count(),
            scene.materials.len()
        );

        Ok(scene)
    }

    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let desc: SceneDescription = serde_json::from_str(json)?;
        Self::from_description(&desc)
    }

    pub fn load_json(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        log::info!("Loading scene from {:?}", path);
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn sky(&self) -> Color {
        self.sky
    }

    pub fn set_sky(&mut self, sky: Color) {
        self.sky = sky;
    }

    /// Material index assigned to sphere `object`.
    pub fn material_index(&self, object: usize) -> Option<u32> {
        self.material_ids.get(object)
    }

    /// Material of sphere `object`.
    pub fn material_for(&self, object: usize) -> Option<&Material> {
        self.material_index(object)
            .and_then(|index| self.materials.get(index as usize))
    }

    /// Closest hit of `ray` against every sphere.
    pub fn intersect(&self, ray: &Ray) -> Intersection {
        let mut hit = Intersection::new();
        for (id, sphere) in self.spheres.iter().enumerate() {
            sphere.intersect(ray, &mut hit, id as u32);
        }
        hit
    }
}
