// Fixed-axis rotations for instance transforms.
//
// Stores sin/cos once so every ray query is just a handful of multiplies.

use crate::{Aabb, Vec3};

/// Coordinate axis a rotation turns about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Indices `(a, b)` of the two components that change under a rotation about this
    /// axis. A positive angle turns `+a` toward `-b`.
    fn plane(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
        }
    }
}

/// Rotation by a fixed angle about one coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRotation {
    axis: Axis,
    sin_theta: f32,
    cos_theta: f32,
}

impl AxisRotation {
    pub fn from_degrees(axis: Axis, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        Self {
            axis,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// World space to object space (inverse rotation).
    pub fn to_object(&self, v: Vec3) -> Vec3 {
        let (a, b) = self.axis.plane();
        let mut out = v.to_array();
        out[a] = self.cos_theta * v[a] - self.sin_theta * v[b];
        out[b] = self.sin_theta * v[a] + self.cos_theta * v[b];
        Vec3::from_array(out)
    }

    /// Object space to world space.
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        let (a, b) = self.axis.plane();
        let mut out = v.to_array();
        out[a] = self.cos_theta * v[a] + self.sin_theta * v[b];
        out[b] = -self.sin_theta * v[a] + self.cos_theta * v[b];
        Vec3::from_array(out)
    }

    /// World-space box of an object-space box: the extent of its 8 rotated corners.
    pub fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners();

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for corner in corners {
            let rotated = self.to_world(corner);
            result_min = result_min.min(rotated);
            result_max = result_max.max(rotated);
        }

        Aabb::from_points(result_min, result_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_round_trip_all_axes() {
        let p = Vec3::new(5.0, 3.0, 2.0);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let rot = AxisRotation::from_degrees(axis, 37.0);
            assert_near(rot.to_world(rot.to_object(p)), p);
            assert_near(rot.to_object(rot.to_world(p)), p);
        }
    }

    #[test]
    fn test_rotation_preserves_axis_component() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(AxisRotation::from_degrees(Axis::X, 50.0).to_world(p).x, 1.0);
        assert_eq!(AxisRotation::from_degrees(Axis::Y, 50.0).to_world(p).y, 2.0);
        assert_eq!(AxisRotation::from_degrees(Axis::Z, 50.0).to_world(p).z, 3.0);
    }

    #[test]
    fn test_quarter_turn_about_y() {
        let rot = AxisRotation::from_degrees(Axis::Y, 90.0);
        // +x turns into -z, +z turns into +x
        assert_near(rot.to_world(Vec3::X), Vec3::new(0.0, 0.0, -1.0));
        assert_near(rot.to_world(Vec3::Z), Vec3::X);
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let rot = AxisRotation::from_degrees(Axis::Z, 90.0);
        assert_near(rot.to_world(Vec3::X), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_transform_aabb_swaps_extents() {
        let rot = AxisRotation::from_degrees(Axis::Y, 90.0);
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(4.0, 1.0, 2.0));
        let rotated = rot.transform_aabb(&aabb);

        assert!((rotated.x.size() - 2.0).abs() < 1e-4);
        assert!((rotated.y.size() - 1.0).abs() < 1e-4);
        assert!((rotated.z.size() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_transform_aabb_contains_rotated_corners() {
        let rot = AxisRotation::from_degrees(Axis::X, 30.0);
        let aabb = Aabb::from_points(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 5.0, 4.0));
        let rotated = rot.transform_aabb(&aabb);

        for corner in aabb.corners() {
            let p = rot.to_world(corner);
            assert!(rotated.contains(p), "{:?} outside {:?}", p, rotated);
        }
    }
}
