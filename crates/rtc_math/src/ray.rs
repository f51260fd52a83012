use crate::{Interval, Vec3};

/// Offsets smaller than this are applied as plain floats instead of ULPs.
const ORIGIN: f32 = 1.0 / 32.0;
const FLOAT_SCALE: f32 = 1.0 / 65536.0;
const INT_SCALE: f32 = 256.0;

/// A ray with an origin, a direction and a parametric validity window.
///
/// A point `at(t)` is only considered part of the ray when
/// `range.min <= t <= range.max`. The direction is expected to be unit length
/// so that `t` is a distance; this is not enforced.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub range: Interval,
}

impl Ray {
    /// Create a ray valid on `[min_t, max_t]`.
    pub fn new(origin: Vec3, min_t: f32, direction: Vec3, max_t: f32) -> Self {
        Self {
            origin,
            direction,
            range: Interval::new(min_t, max_t),
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn min_t(&self) -> f32 {
        self.range.min
    }

    #[inline]
    pub fn max_t(&self) -> f32 {
        self.range.max
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The continuation of a path after a bounce at `position`.
    ///
    /// The new origin is pushed off the surface along the geometric normal
    /// `geometric_normal` and the range is reset to `[0, inf]`.
    pub fn redirect(position: Vec3, geometric_normal: Vec3, direction: Vec3) -> Self {
        Self {
            origin: offset_epsilon(position, geometric_normal),
            direction,
            range: Interval::FORWARD,
        }
    }

    /// This ray with its range set to `[-1, -1]`, ending the path.
    pub fn terminated(self) -> Self {
        Self {
            range: Interval::new(-1.0, -1.0),
            ..self
        }
    }

    /// True once a bounce has ended the path.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.range.min < 0.0
    }
}

/// Nudge `position` off a surface along `geometric_normal`.
///
/// Each component moves by a number of ULPs proportional to the normal, so
/// the step scales with the magnitude of the coordinate. Components close to
/// zero, where ULPs are vanishingly small, move by a fixed float epsilon
/// instead (Ray Tracing Gems, chapter 6).
pub fn offset_epsilon(position: Vec3, geometric_normal: Vec3) -> Vec3 {
    let p = position.to_array();
    let n = geometric_normal.to_array();

    Vec3::from_array(std::array::from_fn(|i| {
        if p[i].abs() < ORIGIN {
            p[i] + FLOAT_SCALE * n[i]
        } else {
            let offset = (INT_SCALE * n[i]) as i32;
            let delta = if p[i] < 0.0 { -offset } else { offset };
            f32::from_bits((p[i].to_bits() as i32).wrapping_add(delta) as u32)
        }
    }))
}
