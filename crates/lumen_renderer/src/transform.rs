//! Instance transforms: re-express a hittable under a translation or an axis rotation.
//!
//! Both wrappers move the ray into the object's space, delegate, and move the hit back.
//! Wrappers nest, so a box rotated and then moved is `Translate::new(Rotate::y(box, a), d)`.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Ray};
use lumen_math::{Aabb, Axis, AxisRotation, Interval, Vec3};
use rand::RngCore;

/// A hittable displaced by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box() + offset;
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let offset_ray = ray.with_origin(ray.origin() - self.offset);

        if !self.object.hit(&offset_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A hittable rotated about one coordinate axis through the origin.
pub struct Rotate {
    object: Arc<dyn Hittable>,
    rotation: AxisRotation,
    bbox: Aabb,
}

impl Rotate {
    pub fn new(object: Arc<dyn Hittable>, axis: Axis, degrees: f32) -> Self {
        let rotation = AxisRotation::from_degrees(axis, degrees);
        let bbox = rotation.transform_aabb(&object.bounding_box());
        Self {
            object,
            rotation,
            bbox,
        }
    }

    pub fn x(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Axis::X, degrees)
    }

    pub fn y(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Axis::Y, degrees)
    }

    pub fn z(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Axis::Z, degrees)
    }

    pub fn axis(&self) -> Axis {
        self.rotation.axis()
    }
}

impl Hittable for Rotate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let rotated = Ray::new(
            self.rotation.to_object(ray.origin()),
            self.rotation.to_object(ray.direction()),
            ray.time(),
        );

        if !self.object.hit(&rotated, ray_t, rec, rng) {
            return false;
        }

        // Rotation preserves dot products, so the front-face flag is still valid
        rec.p = self.rotation.to_world(rec.p);
        rec.normal = self.rotation.to_world(rec.normal);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
