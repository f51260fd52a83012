//! Analytic sphere primitive.

use crate::{checked_pow2, sign_inc, Intersection, MathResult, Ray, Vec3, Vec4};

/// A sphere packed into one vector: center in xyz, radius squared in w.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere(Vec4);

impl Sphere {
    /// Create a sphere, failing for negative or non-finite radii.
    pub fn new(center: Vec3, radius: f32) -> MathResult<Self> {
        Ok(Self(center.extend(checked_pow2(radius)?)))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.0.truncate()
    }

    #[inline]
    pub fn radius_squared(&self) -> f32 {
        self.0.w
    }

    pub fn radius(&self) -> f32 {
        self.0.w.sqrt()
    }

    /// The packed `(center, radius²)` vector.
    pub fn packed(&self) -> Vec4 {
        self.0
    }

    /// Outward unit normal for a point on the surface.
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        (p - self.center()).normalize()
    }

    /// Test `ray` against this sphere and record the hit in `hit`.
    ///
    /// Uses the cancellation-free form of the quadratic (Ray Tracing Gems,
    /// chapter 7), assuming a unit-length direction. When the origin is
    /// outside, only the entry point is offered; from inside, only the exit.
    pub fn intersect(&self, ray: &Ray, hit: &mut Intersection, object: u32) -> bool {
        let f = ray.origin - self.center();
        let b = -f.dot(ray.direction);
        let r2 = self.radius_squared();

        let discriminant = r2 - (f + ray.direction * b).length_squared();

        if discriminant < 0.0 {
            return false;
        }

        if discriminant == 0.0 {
            return hit.check(ray, b, object);
        }

        let c = f.length_squared() - r2;
        let q = b + sign_inc(b) * discriminant.sqrt();

        let o0 = c / q;
        let o1 = q;

        // c < 0: the origin is inside and the roots straddle it
        if c < 0.0 {
            return hit.check(ray, o0.max(o1), object);
        }

        hit.check(ray, o0.min(o1), object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MathError;

    fn forward(origin: Vec3, direction: Vec3) -> Ray {
        Ray::new(origin, 0.0, direction.normalize(), f32::INFINITY)
    }

    #[test]
    fn test_sphere_packing() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 2.0).unwrap();
        assert_eq!(sphere.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.radius_squared(), 4.0);
        assert_eq!(sphere.radius(), 2.0);
        assert_eq!(sphere.packed(), Vec4::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_sphere_rejects_negative_radius() {
        assert_eq!(
            Sphere::new(Vec3::ZERO, -1.0),
            Err(MathError::NegativeBase(-1.0))
        );
        assert!(Sphere::new(Vec3::ZERO, f32::NAN).is_err());
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5).unwrap();
        let ray = forward(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut hit = Intersection::new();

        assert!(sphere.intersect(&ray, &mut hit, 3));
        assert!((hit.hit_t - 0.5).abs() < 0.001);
        assert_eq!(hit.object(), Some(3));
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5).unwrap();
        let ray = forward(Vec3::ZERO, Vec3::Y);
        let mut hit = Intersection::new();

        assert!(!sphere.intersect(&ray, &mut hit, 0));
        assert!(!hit.is_hit());
    }

    #[test]
    fn test_sphere_behind_ray() {
        let sphere = Sphere::new(Vec3::new(-5.0, 0.0, 0.0), 1.0).unwrap();
        let ray = forward(Vec3::ZERO, Vec3::X);
        let mut hit = Intersection::new();

        assert!(!sphere.intersect(&ray, &mut hit, 0));
    }

    #[test]
    fn test_tangent_ray_single_root() {
        let sphere = Sphere::new(Vec3::new(3.0, 1.0, 0.0), 1.0).unwrap();
        let ray = forward(Vec3::ZERO, Vec3::X);
        let mut hit = Intersection::new();

        assert!(sphere.intersect(&ray, &mut hit, 0));
        assert_eq!(hit.hit_t, 3.0);
    }

    #[test]
    fn test_hit_lies_on_surface() {
        let sphere = Sphere::new(Vec3::new(0.3, -0.7, 6.0), 1.5).unwrap();
        let origin = Vec3::new(0.1, 0.2, -0.4);

        for i in 0..64 {
            let a = i as f32 / 64.0;
            let target = sphere.center() + Vec3::new(a - 0.5, 0.5 - a * a, 0.0) * 2.0;
            let ray = forward(origin, target - origin);
            let mut hit = Intersection::new();

            if sphere.intersect(&ray, &mut hit, 0) {
                let distance = (ray.at(hit.hit_t) - sphere.center()).length();
                assert!((distance - 1.5).abs() < 1e-4, "distance {distance}");
            }
        }
    }

    #[test]
    fn test_origin_inside_reports_exit() {
        let sphere = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0).unwrap();
        let origin = Vec3::new(0.5, 0.25, 0.0);
        let directions = [Vec3::X, -Vec3::X, Vec3::Y, Vec3::new(-1.0, -1.0, 0.3)];

        for dir in directions {
            let ray = forward(origin, dir);
            let mut hit = Intersection::new();

            assert!(sphere.intersect(&ray, &mut hit, 0), "{dir:?}");
            assert!(hit.hit_t > 0.0);

            let exit = ray.at(hit.hit_t);
            assert!(((exit - sphere.center()).length() - 2.0).abs() < 1e-4);
            // Leaving the sphere: moving along the outward normal
            assert!(sphere.normal_at(exit).dot(ray.direction) > 0.0);
        }
    }

    #[test]
    fn test_closest_of_two_spheres() {
        let near = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0).unwrap();
        let far = Sphere::new(Vec3::new(8.0, 0.0, 0.0), 1.0).unwrap();
        let ray = forward(Vec3::ZERO, Vec3::X);
        let mut hit = Intersection::new();

        far.intersect(&ray, &mut hit, 1);
        near.intersect(&ray, &mut hit, 0);
        assert_eq!(hit.object(), Some(0));
        assert!((hit.hit_t - 2.0).abs() < 1e-5);

        let mut reversed = Intersection::new();
        near.intersect(&ray, &mut reversed, 0);
        assert!(!far.intersect(&ray, &mut reversed, 1));
        assert_eq!(reversed, hit);
    }
}
