// Rigid transforms (rotation + translation) for placing cameras.

use glam::{EulerRot, Quat, Vec3};

/// A rotation followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: Quat,
    pub position: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        rotation: Quat::IDENTITY,
        position: Vec3::ZERO,
    };

    pub fn new(rotation: Quat, position: Vec3) -> Self {
        Self { rotation, position }
    }

    /// Build from yaw/pitch/roll in degrees (Y, then X, then Z).
    pub fn from_euler_degrees(euler: Vec3, position: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            euler.y.to_radians(),
            euler.x.to_radians(),
            euler.z.to_radians(),
        );
        Self::new(rotation, position)
    }

    /// Transform a point: rotate, then translate.
    #[inline]
    pub fn transform_point3(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.position
    }

    /// Transform a direction; translation does not apply.
    #[inline]
    pub fn transform_vector3(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_transform_point3_translation() {
        let tr = Transform::new(Quat::IDENTITY, Vec3::new(10.0, 20.0, 30.0));
        let point = Vec3::new(1.0, 2.0, 3.0);

        assert_eq!(tr.transform_point3(point), Vec3::new(11.0, 22.0, 33.0));
        assert_eq!(tr.transform_vector3(point), point);
    }

    #[test]
    fn test_transform_rotation() {
        // 90 degree rotation around Z axis
        let tr = Transform::new(Quat::from_rotation_z(PI / 2.0), Vec3::ZERO);
        let transformed = tr.transform_vector3(Vec3::X);

        assert!((transformed - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_from_euler_yaw() {
        // Yawing -90 degrees turns the -Z forward axis towards +X
        let tr = Transform::from_euler_degrees(Vec3::new(0.0, -90.0, 0.0), Vec3::ONE);
        let forward = tr.transform_vector3(Vec3::NEG_Z);

        assert!((forward - Vec3::X).length() < 0.001);
        assert_eq!(tr.position, Vec3::ONE);
    }
}
