//! Camera for ray generation, and the render entry points.

use std::io::{self, Write};
use std::time::Instant;

use crate::bucket::render_buckets;
use crate::random::{gen_f32, random_in_unit_disk};
use crate::renderer::{
    progress_due, render_pixel, write_color, write_ppm_header, ImageBuffer, RenderConfig,
};
use crate::{Color, Hittable, Ray};
use lumen_math::Vec3;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Camera for generating rays into the scene.
#[derive(Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    /// Sampling, depth, background and seed
    pub config: RenderConfig,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            image_height: 100,
            config: RenderConfig::default(),
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            // Cached values (initialized to defaults)
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 0.1,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set the image width and derive the height from a width / height ratio.
    pub fn with_aspect_ratio(self, width: u32, aspect_ratio: f32) -> Self {
        let height = (width as f32 / aspect_ratio) as u32;
        self.with_resolution(width, height)
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.config.samples_per_pixel = samples.max(1);
        self.config.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.config.background = color;
        self
    }

    /// Use the white-to-blue sky instead of the flat background.
    pub fn with_sky_gradient(mut self, enabled: bool) -> Self {
        self.config.use_sky_gradient = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.samples_scale = 1.0 / self.config.samples_per_pixel as f32;
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    /// Render every pixel in scanline order on the calling thread.
    ///
    /// One generator seeded from `config.seed` drives the whole image, so the result is
    /// reproducible.
    pub fn render_image(&mut self, world: &dyn Hittable) -> ImageBuffer {
        let start = self.begin_sequential();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut image = ImageBuffer::new(self.image_width, self.image_height);
        let mut row = Vec::with_capacity(self.image_width as usize);

        for y in 0..self.image_height {
            self.trace_scanline(world, y, &mut rng, &mut row);
            for (x, color) in row.iter().enumerate() {
                image.set(x as u32, y, *color);
            }
        }

        log::info!("Done in {:.2?}", start.elapsed());
        image
    }

    /// Render the scene and write it to `out` as a plain-text PPM.
    ///
    /// Each scanline is written as soon as it is traced; the output is identical to
    /// [`Camera::render_image`] followed by [`ImageBuffer::write_ppm`].
    pub fn render(&mut self, world: &dyn Hittable, out: &mut dyn Write) -> io::Result<()> {
        let start = self.begin_sequential();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut row = Vec::with_capacity(self.image_width as usize);

        write_ppm_header(out, self.image_width, self.image_height)?;
        for y in 0..self.image_height {
            self.trace_scanline(world, y, &mut rng, &mut row);
            for color in &row {
                write_color(out, *color)?;
            }
        }
        out.flush()?;

        log::info!("Done in {:.2?}", start.elapsed());
        Ok(())
    }

    fn begin_sequential(&mut self) -> Instant {
        self.initialize();
        log::info!(
            "Rendering {}x{} @ {} spp, depth {}",
            self.image_width,
            self.image_height,
            self.config.samples_per_pixel,
            self.config.max_depth
        );
        Instant::now()
    }

    /// Trace scanline `y` left to right into `row`.
    fn trace_scanline(
        &self,
        world: &dyn Hittable,
        y: u32,
        rng: &mut dyn RngCore,
        row: &mut Vec<Color>,
    ) {
        let total = self.image_height as usize;
        let remaining = (self.image_height - y) as usize;
        if progress_due(remaining, total) {
            log::info!("Scanlines remaining: {}", remaining);
        }

        row.clear();
        for x in 0..self.image_width {
            row.push(render_pixel(self, world, x, y, rng));
        }
    }

    /// Render in square buckets across the rayon thread pool.
    pub fn render_parallel(&mut self, world: &dyn Hittable, bucket_size: u32) -> ImageBuffer {
        self.initialize();
        render_buckets(self, world, bucket_size)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HittableList;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, 0.0),
            )
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        assert_eq!(camera.center, Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
        assert!((camera.u - Vec3::X).length() < 0.001);
        assert!((camera.v - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_aspect_ratio_sizing() {
        let camera = Camera::new().with_aspect_ratio(400, 16.0 / 9.0);
        assert_eq!((camera.image_width, camera.image_height), (400, 225));

        // Height never drops below one pixel
        let camera = Camera::new().with_aspect_ratio(10, 100.0);
        assert_eq!(camera.image_height, 1);
    }

    #[test]
    fn test_camera_ray_direction() {
        let mut camera = Camera::new()
            .with_resolution(100, 100)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction().z < 0.0);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((0.0..1.0).contains(&ray.time()));

        // Top-left pixel points up and to the left
        let ray = camera.get_ray(0, 0, &mut rng);
        assert!(ray.direction().x < 0.0 && ray.direction().y > 0.0);
    }

    #[test]
    fn test_defocus_jitters_origin() {
        let mut camera = Camera::new()
            .with_resolution(20, 20)
            .with_lens(40.0, 10.0, 5.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(7);
        let radius = 5.0 * (5.0f32).to_radians().tan();
        let mut moved = false;
        for _ in 0..20 {
            let ray = camera.get_ray(10, 10, &mut rng);
            assert!(ray.origin().length() <= radius + 1e-5);
            assert_eq!(ray.origin().z, 0.0);
            moved |= ray.origin() != Vec3::ZERO;
        }
        assert!(moved);
    }

    #[test]
    fn test_render_writes_header_and_every_pixel() {
        let mut camera = Camera::new()
            .with_resolution(4, 3)
            .with_quality(1, 2)
            .with_background(Color::new(0.25, 0.25, 0.25));

        let mut out = Vec::new();
        camera.render(&HittableList::new(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(&lines[..3], &["P3", "4 3", "255"]);
        assert_eq!(lines.len(), 3 + 12);
        assert!(lines[3..].iter().all(|l| *l == "128 128 128"));
    }

    #[test]
    fn test_render_is_reproducible() {
        use crate::{Lambertian, Sphere};
        use std::sync::Arc;

        let world = Sphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            1.0,
            Arc::new(Lambertian::from_color(Color::splat(0.7))),
        );
        let mut camera = Camera::new()
            .with_resolution(8, 8)
            .with_quality(3, 4)
            .with_sky_gradient(true)
            .with_seed(5);

        let first = camera.render_image(&world);
        let second = camera.render_image(&world);
        assert_eq!(first, second);
    }

    #[test]
    fn test_streamed_render_matches_buffered_image() {
        use crate::{Lambertian, Sphere};
        use std::sync::Arc;

        let world = Sphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            1.0,
            Arc::new(Lambertian::from_color(Color::splat(0.6))),
        );
        let mut camera = Camera::new()
            .with_resolution(9, 6)
            .with_quality(2, 3)
            .with_sky_gradient(true)
            .with_seed(13);

        let mut streamed = Vec::new();
        camera.render(&world, &mut streamed).unwrap();

        let mut buffered = Vec::new();
        camera.render_image(&world).write_ppm(&mut buffered).unwrap();

        assert_eq!(streamed, buffered);
    }
}
