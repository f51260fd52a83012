//! Math primitives for the RTC path tracer.
//!
//! Vector and quaternion types come straight from glam; this crate adds the
//! ray, sphere and closest-hit types the integrator is built on.

// Re-export glam for convenience
pub use glam::*;

mod intersection;
mod interval;
mod ray;
mod scalar;
mod sphere;
mod transform;

pub use intersection::Intersection;
pub use interval::Interval;
pub use ray::{offset_epsilon, Ray};
pub use scalar::{checked_pow2, pow5, sign_inc};
pub use sphere::Sphere;
pub use transform::Transform;

use thiserror::Error;

/// Errors raised by checked numeric helpers.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("negative base {0} passed to a checked power")]
    NegativeBase(f32),

    #[error("non-finite value {0}")]
    NonFinite(f32),
}

pub type MathResult<T> = Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.cross(b), Vec3::new(-3.0, 6.0, -3.0));
    }

    #[test]
    fn test_math_error_display() {
        let err = MathError::NegativeBase(-2.0);
        assert_eq!(err.to_string(), "negative base -2 passed to a checked power");
    }
}
