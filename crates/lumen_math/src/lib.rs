// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
mod rotation;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use rotation::{Axis, AxisRotation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let bbox = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.axis_interval(1), Interval::new(0.0, 2.0));

        let ray = Ray::new(Vec3::new(0.5, 1.0, -1.0), Vec3::Z, 0.0);
        assert!(bbox.hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }
}
