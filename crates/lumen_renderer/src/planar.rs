//! Bounded-plane primitives.
//!
//! Every shape here lives on the plane through `q` spanned by `u` and `v`. A hit point `p` on
//! the plane has plane coordinates `(alpha, beta)` with `p = q + alpha * u + beta * v`;
//! the shapes only differ in which `(alpha, beta)` count as inside and how those map to
//! texture coordinates.
//!
//! Quads and triangles are anchored at a corner `q`. The remaining shapes are centred on `q`
//! and measure their radii in units of `u` and `v`.

use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList, Material, Ray};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use thiserror::Error;

/// Rays closer than this to parallel with the plane are treated as misses.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Errors from building a primitive with parameters that describe no shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("hyperbola requires c > len > 0 (got c = {c}, len = {len})")]
    InvalidHyperbola { c: f32, len: f32 },
}

pub type GeometryResult<T> = Result<T, GeometryError>;

/// Interior test of a planar primitive, in plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Unit square: `alpha, beta` in `[0, 1]`.
    Quad,
    /// `alpha > 0`, `beta > 0`, `alpha + beta < 1`.
    Triangle,
    Circle { radius: f32 },
    Annulus { inner: f32, outer: f32 },
    /// Axis-aligned ellipse with radii `rx` along `u` and `ry` along `v`.
    Ellipse { rx: f32, ry: f32 },
    /// `beta^2 <= 4 p alpha` clipped to the unit square around `q`; `flipped` swaps the roles
    /// of `alpha` and `beta`, opening the curve along `v` instead of `u`.
    Parabola { p: f32, flipped: bool },
    /// `alpha^2 / len^2 - beta^2 / (c^2 - len^2) >= 1` clipped to `|alpha|, |beta| <= c`.
    Hyperbola { c: f32, len: f32 },
}

impl Shape {
    /// Half extents along `u` and `v` for shapes centred on `q`.
    fn half_extents(&self) -> Option<(f32, f32)> {
        match *self {
            Shape::Quad | Shape::Triangle => None,
            Shape::Circle { radius } => Some((radius, radius)),
            Shape::Annulus { outer, .. } => Some((outer, outer)),
            Shape::Ellipse { rx, ry } => Some((rx, ry)),
            Shape::Parabola { .. } => Some((1.0, 1.0)),
            Shape::Hyperbola { c, .. } => Some((c, c)),
        }
    }

    /// Texture coordinates for a point inside the shape, or `None` if it is outside.
    pub fn interior_uv(&self, a: f32, b: f32) -> Option<(f32, f32)> {
        let inside = match *self {
            Shape::Quad => Interval::UNIT.contains(a) && Interval::UNIT.contains(b),
            Shape::Triangle => a > 0.0 && b > 0.0 && a + b < 1.0,
            Shape::Circle { radius } => a * a + b * b < radius * radius,
            Shape::Annulus { inner, outer } => {
                let r2 = a * a + b * b;
                inner * inner <= r2 && r2 <= outer * outer
            }
            Shape::Ellipse { rx, ry } => (a * a) / (rx * rx) + (b * b) / (ry * ry) < 1.0,
            Shape::Parabola { p, flipped } => {
                let (along, across) = if flipped { (b, a) } else { (a, b) };
                a.abs() <= 1.0 && b.abs() <= 1.0 && across * across <= 4.0 * p * along
            }
            Shape::Hyperbola { c, len } => {
                a.abs() <= c
                    && b.abs() <= c
                    && (a * a) / (len * len) - (b * b) / (c * c - len * len) >= 1.0
            }
        };

        if !inside {
            return None;
        }

        Some(match self.half_extents() {
            None => (a, b),
            Some((ex, ey)) => (0.5 * (a / ex + 1.0), 0.5 * (b / ey + 1.0)),
        })
    }
}

/// A bounded piece of a plane.
pub struct Planar {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)` with `n = u x v`; projects onto plane coordinates.
    w: Vec3,
    normal: Vec3,
    d: f32,
    shape: Shape,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Planar {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, shape: Shape, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        let bbox = match shape.half_extents() {
            None => Aabb::surrounding(
                &Aabb::from_points(q, q + u + v),
                &Aabb::from_points(q + u, q + v),
            ),
            Some((ex, ey)) => {
                let du = ex * u;
                let dv = ey * v;
                Aabb::surrounding(
                    &Aabb::from_points(q - du - dv, q + du + dv),
                    &Aabb::from_points(q - du + dv, q + du - dv),
                )
            }
        };

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            shape,
            material,
            bbox,
        }
    }

    /// Parallelogram with corners `q`, `q + u`, `q + v`, `q + u + v`.
    pub fn quad(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(q, u, v, Shape::Quad, material)
    }

    /// Triangle with corners `q`, `q + u`, `q + v`.
    pub fn triangle(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(q, u, v, Shape::Triangle, material)
    }

    pub fn circle(q: Vec3, u: Vec3, v: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self::new(q, u, v, Shape::Circle { radius }, material)
    }

    pub fn annulus(
        q: Vec3,
        u: Vec3,
        v: Vec3,
        inner: f32,
        outer: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self::new(q, u, v, Shape::Annulus { inner, outer }, material)
    }

    pub fn ellipse(
        q: Vec3,
        u: Vec3,
        v: Vec3,
        rx: f32,
        ry: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self::new(q, u, v, Shape::Ellipse { rx, ry }, material)
    }

    pub fn parabola(
        q: Vec3,
        u: Vec3,
        v: Vec3,
        p: f32,
        flipped: bool,
        material: Arc<dyn Material>,
    ) -> Self {
        Self::new(q, u, v, Shape::Parabola { p, flipped }, material)
    }

    /// Hyperbola with focal distance `c` and vertex distance `len`.
    pub fn hyperbola(
        q: Vec3,
        u: Vec3,
        v: Vec3,
        c: f32,
        len: f32,
        material: Arc<dyn Material>,
    ) -> GeometryResult<Self> {
        if !(c > len && len > 0.0) {
            log::warn!("Rejecting hyperbola with c = {}, len = {}: need c > len > 0", c, len);
            return Err(GeometryError::InvalidHyperbola { c, len });
        }
        Ok(Self::new(q, u, v, Shape::Hyperbola { c, len }, material))
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Unit normal of the plane, `normalize(u x v)`.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Plane coordinates of a point on the plane.
    pub fn plane_coords(&self, p: Vec3) -> (f32, f32) {
        let planar_hitpt_vector = p - self.q;
        let alpha = self.w.dot(planar_hitpt_vector.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt_vector));
        (alpha, beta)
    }
}

impl Hittable for Planar {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction());

        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);
        let (alpha, beta) = self.plane_coords(intersection);
        let Some((u, v)) = self.shape.interior_uv(alpha, beta) else {
            return false;
        };

        rec.t = t;
        rec.p = intersection;
        rec.u = u;
        rec.v = v;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Closed box spanned by two opposite corners, as six quads.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];

    for (q, u, v) in faces {
        sides.add(Arc::new(Planar::quad(q, u, v, material.clone())));
    }

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Vec3::splat(0.5)))
    }

    /// Fire a ray straight down -z at the plane point `q + a u + b v`.
    fn probe(shape: &Planar, q: Vec3, u: Vec3, v: Vec3, a: f32, b: f32) -> bool {
        let target = q + a * u + b * v;
        let ray = Ray::new(target + Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        shape.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng)
    }

    fn xy_frame() -> (Vec3, Vec3, Vec3) {
        (Vec3::new(-1.0, -1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0))
    }

    #[test]
    fn test_quad_interior_and_exterior() {
        let (q, u, v) = xy_frame();
        let quad = Planar::quad(q, u, v, grey());

        assert!(probe(&quad, q, u, v, 0.3, 0.4));
        assert!(!probe(&quad, q, u, v, 1.5, 0.0));
        assert!(!probe(&quad, q, u, v, 0.5, -0.2));
    }

    #[test]
    fn test_quad_hit_record() {
        let (q, u, v) = xy_frame();
        let quad = Planar::quad(q, u, v, grey());

        let target = q + 0.3 * u + 0.4 * v;
        let ray = Ray::new(target + Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));

        assert!((rec.t - 5.0).abs() < 1e-4);
        assert!((rec.p - target).length() < 1e-4);
        assert!((rec.u - 0.3).abs() < 1e-4);
        assert!((rec.v - 0.4).abs() < 1e-4);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let (q, u, v) = xy_frame();
        let quad = Planar::quad(q, u, v, grey());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::X, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        assert!(!quad.hit(&ray, Interval::UNIVERSE, &mut rec, &mut rng));
    }

    #[test]
    fn test_quad_bbox_is_padded() {
        let (q, u, v) = xy_frame();
        let bbox = Planar::quad(q, u, v, grey()).bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.contains(Vec3::new(1.0, 1.0, 0.0)));
        assert!(bbox.contains(Vec3::new(-1.0, -1.0, 0.0)));
    }

    #[test]
    fn test_triangle() {
        let (q, u, v) = xy_frame();
        let tri = Planar::triangle(q, u, v, grey());

        assert!(probe(&tri, q, u, v, 0.2, 0.2));
        assert!(!probe(&tri, q, u, v, 0.6, 0.6));
        assert!(!probe(&tri, q, u, v, -0.1, 0.5));
    }

    #[test]
    fn test_circle_and_annulus() {
        let q = Vec3::ZERO;
        let (u, v) = (Vec3::X, Vec3::Y);

        let circle = Planar::circle(q, u, v, 1.0, grey());
        assert!(probe(&circle, q, u, v, 0.0, 0.0));
        assert!(probe(&circle, q, u, v, 0.6, -0.6));
        assert!(!probe(&circle, q, u, v, 0.8, 0.8));

        let ring = Planar::annulus(q, u, v, 0.5, 1.0, grey());
        assert!(!probe(&ring, q, u, v, 0.0, 0.0));
        assert!(probe(&ring, q, u, v, 0.75, 0.0));
        assert!(!probe(&ring, q, u, v, 1.1, 0.0));

        let bbox = ring.bounding_box();
        assert!((bbox.x.size() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_ellipse() {
        let q = Vec3::ZERO;
        let (u, v) = (Vec3::X, Vec3::Y);
        let ellipse = Planar::ellipse(q, u, v, 0.5, 1.5, grey());

        assert!(probe(&ellipse, q, u, v, 0.0, 1.4));
        assert!(!probe(&ellipse, q, u, v, 0.6, 0.0));
        assert!((ellipse.bounding_box().y.size() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_parabola() {
        let q = Vec3::ZERO;
        let (u, v) = (Vec3::X, Vec3::Y);

        let opens_along_u = Planar::parabola(q, u, v, 0.25, false, grey());
        assert!(probe(&opens_along_u, q, u, v, 0.9, 0.5));
        assert!(!probe(&opens_along_u, q, u, v, 0.1, 0.9));
        assert!(!probe(&opens_along_u, q, u, v, -0.5, 0.0));

        let opens_along_v = Planar::parabola(q, u, v, 0.25, true, grey());
        assert!(probe(&opens_along_v, q, u, v, 0.5, 0.9));
        assert!(!probe(&opens_along_v, q, u, v, 0.9, 0.1));
    }

    #[test]
    fn test_hyperbola() {
        let q = Vec3::ZERO;
        let (u, v) = (Vec3::X, Vec3::Y);
        let hyperbola = Planar::hyperbola(q, u, v, 2.0, 1.0, grey()).unwrap();

        // Both branches
        assert!(probe(&hyperbola, q, u, v, 1.5, 0.0));
        assert!(probe(&hyperbola, q, u, v, -1.5, 0.0));
        // Between the vertices
        assert!(!probe(&hyperbola, q, u, v, 0.5, 0.0));
        // Outside the clip square
        assert!(!probe(&hyperbola, q, u, v, 2.5, 0.0));
    }

    #[test]
    fn test_invalid_hyperbola_is_rejected() {
        let q = Vec3::ZERO;
        let (u, v) = (Vec3::X, Vec3::Y);

        for (c, len) in [(1.0, 2.0), (1.0, 1.0), (1.0, 0.0), (1.0, -0.5)] {
            let result = Planar::hyperbola(q, u, v, c, len, grey());
            assert!(
                matches!(result, Err(GeometryError::InvalidHyperbola { .. })),
                "c = {}, len = {} should be rejected",
                c,
                len
            );
        }
    }

    #[test]
    fn test_make_box() {
        let sides = make_box(Vec3::new(1.0, 1.0, 1.0), Vec3::ZERO, grey());
        assert_eq!(sides.len(), 6);

        let bbox = sides.bounding_box();
        assert!(bbox.contains(Vec3::ZERO));
        assert!(bbox.contains(Vec3::ONE));

        // Every axis direction enters through a face at distance 4
        let mut rng = StdRng::seed_from_u64(0);
        for dir in [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z] {
            let origin = Vec3::splat(0.5) - 4.5 * dir;
            let ray = Ray::new(origin, dir, 0.0);
            let mut rec = HitRecord::default();
            assert!(sides.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
            assert!((rec.t - 4.0).abs() < 1e-4, "direction {:?}: t = {}", dir, rec.t);
            assert!(rec.front_face);
        }
    }
}
