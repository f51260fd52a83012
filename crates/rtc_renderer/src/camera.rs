//! Pinhole camera for primary ray generation.

use rtc_math::{Quat, Ray, Transform, Vec3};
use serde::{Deserialize, Serialize};

use crate::{RenderError, RenderResult};

/// Pinhole camera looking down its local -Z axis.
///
/// The frustum is stored as the world-space top-left corner of the image
/// plane at unit depth plus two edge vectors spanning it. The edges are not
/// normalized: they cover the whole plane and are scaled per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    transform: Transform,
    /// Top-left corner of the image plane
    origin: Vec3,
    /// Left-to-right edge of the image plane
    right: Vec3,
    /// Top-to-bottom edge of the image plane (rows grow downwards)
    up: Vec3,
    near: f32,
    far: f32,
    fov_radians: f32,
}

impl Camera {
    /// Build a camera for a `width` x `height` viewport.
    ///
    /// `fov_degrees` is the vertical field of view. An empty viewport is
    /// rejected since the aspect ratio would be undefined.
    pub fn new(
        orientation: Quat,
        position: Vec3,
        fov_degrees: f32,
        near: f32,
        far: f32,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyViewport { width, height });
        }

        let fov_radians = fov_degrees.to_radians();
        let aspect = width as f32 / height as f32;
        let tan_half_fov = (fov_radians * 0.5).tan();

        let transform = Transform::new(orientation, position);
        let half_width = aspect * tan_half_fov;

        let p0 = transform.transform_point3(Vec3::new(-half_width, tan_half_fov, -1.0));
        let p1 = transform.transform_point3(Vec3::new(half_width, tan_half_fov, -1.0));
        let p2 = transform.transform_point3(Vec3::new(-half_width, -tan_half_fov, -1.0));

        Ok(Self {
            transform,
            origin: p0,
            right: p1 - p0,
            up: p2 - p0,
            near,
            far,
            fov_radians,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn orientation(&self) -> Quat {
        self.transform.rotation
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_radians
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Ray through pixel `(x, y)` offset by `(jitter_x, jitter_y)` within it.
    ///
    /// Jitter of `0.5` samples the pixel centre; callers supersample by
    /// varying it. The ray is valid on `[near, far]`.
    pub fn generate_ray(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        jitter_x: f32,
        jitter_y: f32,
    ) -> RenderResult<Ray> {
        if x >= width || y >= height {
            return Err(RenderError::PixelOutOfBounds { x, y, width, height });
        }

        let u = (x as f32 + jitter_x) / width as f32;
        let v = (y as f32 + jitter_y) / height as f32;

        let sample = self.origin + self.right * u + self.up * v;
        let direction = (sample - self.transform.position).normalize();

        Ok(Ray::new(
            self.transform.position,
            self.near,
            direction,
            self.far,
        ))
    }
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.01
}

fn default_far() -> f32 {
    1000.0
}

/// Serializable camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    #[serde(default)]
    pub position: Vec3,
    /// Pitch, yaw, roll in degrees
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl CameraDescription {
    pub fn build(&self, width: u32, height: u32) -> RenderResult<Camera> {
        let transform = Transform::from_euler_degrees(self.rotation, self.position);
        Camera::new(
            transform.rotation,
            transform.position,
            self.fov,
            self.near,
            self.far,
            width,
            height,
        )
    }
}
