//! RTC Renderer - CPU path tracing over analytic spheres.
//!
//! Turns a pinhole [`Camera`] and a [`Scene`](rtc_core::Scene) into shaded
//! pixels by Monte Carlo integration, with a GGX specular lobe and a
//! cosine-weighted diffuse lobe per bounce.
//!
//! Frames can be rendered on the calling thread ([`render`]), through rayon
//! ([`render_parallel`]), or by a [`RenderPool`] of persistent workers that
//! each own a horizontal band of the image and are reused across frames.

mod band;
mod camera;
mod error;
mod framebuffer;
mod integrator;
mod pixel;
mod pool;
pub mod shading;

pub use band::{partition_rows, render_band, Band};
pub use camera::{Camera, CameraDescription};
pub use error::{RenderError, RenderResult};
pub use framebuffer::Framebuffer;
pub use integrator::{
    render, render_parallel, render_pixel, trace_path, trace_primary, Frame, RenderSettings,
};
pub use pixel::{linear_to_srgb, srgb_to_linear, unpack_srgba8, PixelFormat};
pub use pool::RenderPool;

/// Re-export common math and scene types
pub use rtc_core::{Color, Material, Scene};
pub use rtc_math::{Intersection, Quat, Ray, Sphere, Vec3, Vec4};
