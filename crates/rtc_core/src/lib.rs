//! RTC Core - scene and material data for the sphere path tracer.
//!
//! This crate provides:
//!
//! - **Materials**: packed physically-based [`Material`] with checked
//!   texture-slot and flag accessors
//! - **Scenes**: an unordered list of spheres with packed material
//!   assignments and a sky colour, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use rtc_core::Scene;
//!
//! let scene = Scene::load_json("scene.json")?;
//! println!("Loaded {} spheres", scene.sphere_count());
//! ```

pub mod description;
pub mod material;
pub mod packed;
pub mod scene;

/// Linear RGB colour.
pub type Color = rtc_math::Vec3;

// Re-export commonly used types
pub use description::{MaterialDescription, SceneDescription, SphereDescription};
pub use material::{Material, MaterialError, MaterialTexture};
pub use packed::{PackError, PackedIndices};
pub use scene::{Scene, SceneError, SceneResult};
