//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// A sphere primitive, optionally moving linearly over the shutter interval.
pub struct Sphere {
    /// Center at time 0 and the displacement reached at time 1.
    center: Ray,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::new(center, Vec3::ZERO, 0.0),
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere whose center moves from `center1` at time 0 to `center2` at time 1.
    pub fn moving(center1: Vec3, center2: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);
        let box2 = Aabb::from_points(center2 - rvec, center2 + rvec);

        Self {
            center: Ray::new(center1, center2 - center1, 0.0),
            radius,
            material,
            bbox: Aabb::surrounding(&box1, &box2),
        }
    }

    /// Center at the given ray time.
    #[inline]
    pub fn center_at(&self, time: f32) -> Vec3 {
        self.center.at(time)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from -Y
        // phi: angle around Y axis from -X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        let u = phi / (2.0 * PI);
        let v = theta / PI;
        (u, v)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let current_center = self.center_at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - current_center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Vec3::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let interval = Interval::new(0.001, f32::INFINITY);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, interval, &mut rec, &mut rng));
        assert!((rec.t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        let interval = Interval::new(0.001, f32::INFINITY);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&ray, interval, &mut rec, &mut rng));
    }

    #[test]
    fn test_hit_point_lies_on_surface() {
        let mut rng = StdRng::seed_from_u64(0);
        for radius in [0.1, 1.0, 7.5, 120.0] {
            let center = Vec3::new(3.0, -2.0, 1.0);
            let sphere = Sphere::new(center, radius, grey());
            let origin = center + Vec3::new(0.0, 0.0, radius * 4.0);
            let ray = Ray::new(origin, center - origin, 0.0);

            let mut rec = HitRecord::default();
            assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
            let distance = (rec.p - center).length();
            assert!(
                (distance - radius).abs() < 1e-3 * radius.max(1.0),
                "radius {}: hit at distance {}",
                radius,
                distance
            );
        }
    }

    #[test]
    fn test_second_root_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!(!rec.front_face);
        // Normal faces back toward the ray origin
        assert!((rec.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_tangent_ray() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        // Grazes the top of the sphere: discriminant is exactly zero
        let ray = Ray::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::X, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 5.0).abs() < 1e-4);
        assert!((rec.p - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_interval_excludes_roots() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, grey());
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();

        // Both roots (4 and 6) lie beyond the interval
        assert!(!sphere.hit(&ray, Interval::new(0.001, 3.0), &mut rec, &mut rng));
        // An endpoint equal to a root does not count
        assert!(!sphere.hit(&ray, Interval::new(0.001, 4.0), &mut rec, &mut rng));
        // Only the far root qualifies
        assert!(sphere.hit(&ray, Interval::new(5.0, 10.0), &mut rec, &mut rng));
        assert!((rec.t - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_moving_sphere() {
        let sphere = Sphere::moving(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.5, grey());
        assert_eq!(sphere.center_at(0.5), Vec3::new(0.0, 1.0, 0.0));

        let bbox = sphere.bounding_box();
        assert!(bbox.contains(Vec3::new(0.0, -0.49, 0.0)));
        assert!(bbox.contains(Vec3::new(0.0, 2.49, 0.0)));

        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        let interval = Interval::new(0.001, f32::INFINITY);

        // At time 0 the sphere sits at the origin
        let ray = Ray::new(Vec3::new(0.0, 2.0, 5.0), -Vec3::Z, 0.0);
        assert!(!sphere.hit(&ray, interval, &mut rec, &mut rng));

        // At time 1 it has moved up to y = 2
        let ray = Ray::new(Vec3::new(0.0, 2.0, 5.0), -Vec3::Z, 1.0);
        assert!(sphere.hit(&ray, interval, &mut rec, &mut rng));
        assert!((rec.t - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_uv() {
        // +x maps to u = 0.5, poles map to v = 0 and v = 1
        let (u, v) = Sphere::get_sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        let (_, v) = Sphere::get_sphere_uv(-Vec3::Y);
        assert!(v.abs() < 1e-5);
        let (_, v) = Sphere::get_sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-5);

        let (u, _) = Sphere::get_sphere_uv(-Vec3::X);
        assert!(u.abs() < 1e-5 || (u - 1.0).abs() < 1e-5);
    }
}
