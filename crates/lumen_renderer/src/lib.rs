//! Lumen - an offline Monte Carlo path tracer.
//!
//! Scenes are trees of [`Hittable`]s (spheres, bounded planes, transforms, volumes and a
//! BVH over them) shaded by [`Material`]s that read [`Texture`]s. A [`Camera`] renders the
//! tree to an [`ImageBuffer`] or straight to a plain-text PPM stream.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod medium;
mod perlin;
mod planar;
pub mod random;
mod renderer;
mod sphere;
mod texture;
mod transform;

pub use bucket::{
    generate_buckets, render_bucket, render_buckets, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    ScatterResult,
};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use planar::{make_box, GeometryError, GeometryResult, Planar, Shape};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render_pixel, sky_gradient, write_color,
    write_ppm_header, ImageBuffer, RenderConfig,
};
pub use sphere::Sphere;
pub use texture::{
    CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture, MISSING_TEXTURE_COLOR,
};
pub use transform::{Rotate, Translate};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Axis, Interval, Ray, Vec3};
