use crate::Ray;

/// Closest hit found so far along a single ray.
///
/// Starts out empty (`hit_t < 0`) and only ever moves closer as primitives
/// are tested against the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub hit_t: f32,
    pub object: u32,
}

impl Intersection {
    /// Sentinel object id for "nothing hit".
    pub const NO_OBJECT: u32 = u32::MAX;

    pub const fn new() -> Self {
        Self {
            hit_t: -1.0,
            object: Self::NO_OBJECT,
        }
    }

    /// Whether any primitive has been accepted yet.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.hit_t >= 0.0
    }

    /// Index of the hit primitive, if any.
    pub fn object(&self) -> Option<usize> {
        self.is_hit().then_some(self.object as usize)
    }

    /// Offer a candidate distance `t` for primitive `object`.
    ///
    /// The candidate is accepted when it lies inside the ray's range and is
    /// closer than the current hit (or there is none). Returns true when it
    /// became the new closest hit.
    pub fn check(&mut self, ray: &Ray, t: f32, object: u32) -> bool {
        let before_hit = self.hit_t < 0.0 || t < self.hit_t;

        if before_hit && ray.range.contains(t) {
            self.hit_t = t;
            self.object = object;
            return true;
        }

        false
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    fn ray() -> Ray {
        Ray::new(Vec3::ZERO, 0.1, Vec3::X, 100.0)
    }

    #[test]
    fn test_intersection_starts_empty() {
        let hit = Intersection::new();
        assert!(!hit.is_hit());
        assert_eq!(hit.object(), None);
        assert_eq!(hit.object, Intersection::NO_OBJECT);
    }

    #[test]
    fn test_check_keeps_closest() {
        let ray = ray();
        let mut hit = Intersection::new();

        assert!(hit.check(&ray, 10.0, 0));
        assert!(hit.check(&ray, 4.0, 1));
        assert!(!hit.check(&ray, 4.0, 2));
        assert!(!hit.check(&ray, 7.0, 3));

        assert_eq!(hit.hit_t, 4.0);
        assert_eq!(hit.object(), Some(1));
    }

    #[test]
    fn test_check_never_increases() {
        let ray = ray();
        let mut hit = Intersection::new();
        hit.check(&ray, 5.0, 0);

        for t in [5.0, 6.0, 50.0, 99.0] {
            hit.check(&ray, t, 9);
            assert_eq!(hit.hit_t, 5.0);
        }
    }

    #[test]
    fn test_check_respects_range() {
        let ray = ray();
        let mut hit = Intersection::new();

        assert!(!hit.check(&ray, 0.05, 0));
        assert!(!hit.check(&ray, 100.5, 0));
        assert!(!hit.check(&ray, -3.0, 0));
        assert!(!hit.is_hit());

        assert!(hit.check(&ray, 0.1, 0));
        assert!(hit.is_hit());
    }

    #[test]
    fn test_terminated_ray_accepts_nothing() {
        let ray = ray().terminated();
        let mut hit = Intersection::new();
        assert!(!hit.check(&ray, 1.0, 0));
    }
}
