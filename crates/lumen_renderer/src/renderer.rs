//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - Plain-text PPM output

use std::io::{self, Write};

use crate::{Camera, Color, HitRecord, Hittable, Ray};
use lumen_math::Interval;
use rand::RngCore;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
    /// Base seed for every random stream of a render
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 10,
            max_depth: 10,
            background: Color::ZERO,
            use_sky_gradient: false,
            seed: 0,
        }
    }
}

/// Shadow-acne epsilon: scattered rays ignore hits closer than this.
const T_MIN: f32 = 0.001;

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    // Check if ray hits anything
    if !world.hit(ray, Interval::new(T_MIN, f32::INFINITY), &mut rec, rng) {
        // Ray didn't hit anything - return background
        if config.use_sky_gradient {
            return sky_gradient(ray);
        }
        return config.background;
    }

    // Get emission from material (for lights)
    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    // Try to scatter the ray
    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            // Ray scattered - continue tracing
            let scattered_color = ray_color(&result.scattered, world, depth - 1, config, rng);
            emission + result.attenuation * scattered_color
        }
        None => {
            // Ray was absorbed - just return emission
            emission
        }
    }
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.000, 0.999);
    let quantize = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Write the three header lines of a plain (P3) PPM image.
pub fn write_ppm_header(out: &mut dyn Write, width: u32, height: u32) -> io::Result<()> {
    write!(out, "P3\n{} {}\n255\n", width, height)
}

/// Write one pixel as a line of three integers.
pub fn write_color(out: &mut dyn Write, color: Color) -> io::Result<()> {
    let [r, g, b] = color_to_rgb(color);
    writeln!(out, "{} {} {}", r, g, b)
}

/// Whether a progress line is due with `remaining` of `total` units left.
///
/// Reports the first and last unit and then about every twentieth of the work.
pub(crate) fn progress_due(remaining: usize, total: usize) -> bool {
    let step = (total / 20).max(1);
    remaining == total || remaining % step == 0
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let config = &camera.config;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    // Average the samples
    pixel_color * camera.samples_scale()
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Gamma-corrected RGB bytes, row-major from the top-left.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb(*c)).collect()
    }

    /// Write the image as a plain-text PPM, one pixel per line.
    pub fn write_ppm(&self, out: &mut dyn Write) -> io::Result<()> {
        write_ppm_header(out, self.width, self.height)?;
        for color in &self.pixels {
            write_color(out, *color)?;
        }
        out.flush()
    }
}
