//! Demo scenes, each paired with the camera that frames it.

use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;
use lumen_renderer::random::{gen_f32, gen_range_f32, random_vec3};
use lumen_renderer::{
    make_box, BvhNode, Camera, CheckerTexture, Color, ConstantMedium, Dielectric, DiffuseLight,
    Hittable, HittableList, ImageTexture, Lambertian, Material, Metal, NoiseTexture, Planar,
    Rotate, Sphere, Texture, Translate, Vec3,
};
use rand::RngCore;

const EARTH_IMAGE: &str = "earthmap.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneName {
    BouncingSpheres,
    CheckeredSpheres,
    Earth,
    PerlinSpheres,
    Quads,
    Primitives,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    FinalScene,
}

impl SceneName {
    pub const ALL: [SceneName; 10] = [
        SceneName::BouncingSpheres,
        SceneName::CheckeredSpheres,
        SceneName::Earth,
        SceneName::PerlinSpheres,
        SceneName::Quads,
        SceneName::Primitives,
        SceneName::SimpleLight,
        SceneName::CornellBox,
        SceneName::CornellSmoke,
        SceneName::FinalScene,
    ];
}

/// A world to render and the camera set up for it.
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub camera: Camera,
    /// Width over height, kept so a width override can resize the image.
    pub aspect_ratio: f32,
}

/// Build the named scene, drawing any random layout from `rng`.
pub fn build(name: SceneName, rng: &mut dyn RngCore) -> Result<Scene> {
    log::info!("Building scene {:?}", name);
    let scene = match name {
        SceneName::BouncingSpheres => bouncing_spheres(rng),
        SceneName::CheckeredSpheres => checkered_spheres(),
        SceneName::Earth => earth(),
        SceneName::PerlinSpheres => perlin_spheres(rng),
        SceneName::Quads => quads(),
        SceneName::Primitives => primitives()?,
        SceneName::SimpleLight => simple_light(rng),
        SceneName::CornellBox => cornell_box(),
        SceneName::CornellSmoke => cornell_smoke(),
        SceneName::FinalScene => final_scene(rng),
    };
    Ok(scene)
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(albedo))
}

fn textured(tex: Arc<dyn Texture>) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(tex))
}

fn ground_checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

/// Outdoor camera: sky background, 16:9, 400 wide, 100 spp, depth 50.
fn sky_camera(look_from: Vec3, look_at: Vec3, vfov: f32) -> Camera {
    Camera::new()
        .with_aspect_ratio(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_sky_gradient(true)
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, 0.0, 10.0)
}

/// Square camera looking into the 555 unit Cornell box.
fn cornell_camera(width: u32, samples: u32, look_from: Vec3) -> Camera {
    Camera::new()
        .with_aspect_ratio(width, 1.0)
        .with_quality(samples, 50)
        .with_background(Color::ZERO)
        .with_position(look_from, Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
}

fn bouncing_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        textured(ground_checker()),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // diffuse, bouncing upwards over the shutter interval
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let center2 = center + Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(Sphere::moving(
                    center,
                    center2,
                    0.2,
                    lambertian(albedo),
                )));
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    Scene {
        world: Arc::new(BvhNode::new(world)),
        camera: sky_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0).with_lens(20.0, 0.6, 10.0),
        aspect_ratio: 16.0 / 9.0,
    }
}

fn checkered_spheres() -> Scene {
    let checker = textured(ground_checker());
    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, checker.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checker)));

    Scene {
        world: Arc::new(world),
        camera: sky_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        aspect_ratio: 16.0 / 9.0,
    }
}

fn earth() -> Scene {
    let surface = textured(Arc::new(ImageTexture::open(EARTH_IMAGE)));
    let globe = Sphere::new(Vec3::ZERO, 2.0, surface);

    Scene {
        world: Arc::new(globe),
        camera: sky_camera(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, 20.0),
        aspect_ratio: 16.0 / 9.0,
    }
}

fn perlin_world(rng: &mut dyn RngCore) -> HittableList {
    let pertext = textured(Arc::new(NoiseTexture::new(4.0, rng)));
    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        pertext.clone(),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, pertext)));
    world
}

fn perlin_spheres(rng: &mut dyn RngCore) -> Scene {
    Scene {
        world: Arc::new(perlin_world(rng)),
        camera: sky_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        aspect_ratio: 16.0 / 9.0,
    }
}

struct Palette {
    left_red: Arc<dyn Material>,
    back_green: Arc<dyn Material>,
    right_blue: Arc<dyn Material>,
    upper_orange: Arc<dyn Material>,
    lower_teal: Arc<dyn Material>,
}

impl Palette {
    fn new() -> Self {
        Self {
            left_red: lambertian(Color::new(1.0, 0.2, 0.2)),
            back_green: lambertian(Color::new(0.2, 1.0, 0.2)),
            right_blue: lambertian(Color::new(0.2, 0.2, 1.0)),
            upper_orange: lambertian(Color::new(1.0, 0.5, 0.0)),
            lower_teal: lambertian(Color::new(0.2, 0.8, 0.8)),
        }
    }
}

/// Front-on camera used by the flat-shape scenes.
fn square_sky_camera() -> Camera {
    Camera::new()
        .with_aspect_ratio(400, 1.0)
        .with_quality(100, 50)
        .with_sky_gradient(true)
        .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0)
}

fn quads() -> Scene {
    let p = Palette::new();
    let mut world = HittableList::new();

    world.add(Arc::new(Planar::quad(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        p.left_red,
    )));
    world.add(Arc::new(Planar::quad(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        p.back_green,
    )));
    world.add(Arc::new(Planar::quad(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        p.right_blue,
    )));
    world.add(Arc::new(Planar::quad(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        p.upper_orange,
    )));
    world.add(Arc::new(Planar::quad(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        p.lower_teal,
    )));

    Scene {
        world: Arc::new(world),
        camera: square_sky_camera(),
        aspect_ratio: 1.0,
    }
}

/// One of each planar shape, arranged around the view axis.
fn primitives() -> Result<Scene> {
    let p = Palette::new();
    let mut world = HittableList::new();

    // Left wall: circle and triangle
    world.add(Arc::new(Planar::circle(
        Vec3::new(-3.0, 1.5, 3.0),
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(0.0, 1.0, 0.0),
        1.2,
        p.left_red.clone(),
    )));
    world.add(Arc::new(Planar::triangle(
        Vec3::new(-3.0, -2.5, 4.0),
        Vec3::new(0.0, 0.0, -3.0),
        Vec3::new(0.0, 2.5, 0.0),
        p.left_red,
    )));

    // Back wall: parabola beside hyperbola
    world.add(Arc::new(Planar::parabola(
        Vec3::new(-1.2, 0.0, 0.0),
        Vec3::new(-1.5, 0.0, 0.0),
        Vec3::new(0.0, 1.5, 0.0),
        0.5,
        false,
        p.back_green.clone(),
    )));
    world.add(Arc::new(Planar::hyperbola(
        Vec3::new(1.2, 0.0, 0.0),
        Vec3::new(0.5, 0.0, 0.0),
        Vec3::new(0.0, 0.5, 0.0),
        2.0,
        1.5,
        p.back_green,
    )?));

    // Right wall
    world.add(Arc::new(Planar::quad(
        Vec3::new(3.5, -1.5, 1.0),
        Vec3::new(0.0, 0.0, 3.0),
        Vec3::new(0.0, 3.0, 0.0),
        p.right_blue,
    )));

    // Ceiling and floor
    world.add(Arc::new(Planar::annulus(
        Vec3::new(0.0, 3.0, 2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 2.0),
        0.5,
        1.0,
        p.upper_orange,
    )));
    world.add(Arc::new(Planar::ellipse(
        Vec3::new(0.0, -3.0, 3.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -2.0),
        1.5,
        0.75,
        p.lower_teal,
    )));

    Ok(Scene {
        world: Arc::new(world),
        camera: square_sky_camera(),
        aspect_ratio: 1.0,
    })
}

fn simple_light(rng: &mut dyn RngCore) -> Scene {
    let mut world = perlin_world(rng);

    let difflight: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(4.0)));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, difflight.clone())));
    world.add(Arc::new(Planar::quad(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        difflight,
    )));

    let camera = Camera::new()
        .with_aspect_ratio(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_background(Color::ZERO)
        .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Scene {
        world: Arc::new(world),
        camera,
        aspect_ratio: 16.0 / 9.0,
    }
}

struct CornellMaterials {
    red: Arc<dyn Material>,
    white: Arc<dyn Material>,
    green: Arc<dyn Material>,
}

impl CornellMaterials {
    fn new() -> Self {
        Self {
            red: lambertian(Color::new(0.65, 0.05, 0.05)),
            white: lambertian(Color::new(0.73, 0.73, 0.73)),
            green: lambertian(Color::new(0.12, 0.45, 0.15)),
        }
    }
}

/// Five walls of the box; the light goes in separately.
fn cornell_walls(world: &mut HittableList, m: &CornellMaterials) {
    let quad = |q: Vec3, u: Vec3, v: Vec3, mat: &Arc<dyn Material>| -> Arc<dyn Hittable> {
        Arc::new(Planar::quad(q, u, v, mat.clone()))
    };

    world.add(quad(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        &m.green,
    ));
    world.add(quad(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        &m.red,
    ));
    world.add(quad(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        &m.white,
    ));
    world.add(quad(
        Vec3::splat(555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        &m.white,
    ));
    world.add(quad(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        &m.white,
    ));
}

/// The tall and short blocks, turned about Y and placed on the floor.
fn cornell_blocks(white: &Arc<dyn Material>) -> (Arc<dyn Hittable>, Arc<dyn Hittable>) {
    let tall: Arc<dyn Hittable> = Arc::new(make_box(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall = Arc::new(Rotate::y(tall, 15.0));
    let tall: Arc<dyn Hittable> = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> = Arc::new(make_box(Vec3::ZERO, Vec3::splat(165.0), white.clone()));
    let short = Arc::new(Rotate::y(short, -18.0));
    let short: Arc<dyn Hittable> = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    (tall, short)
}

fn cornell_box() -> Scene {
    let m = CornellMaterials::new();
    let mut world = HittableList::new();
    cornell_walls(&mut world, &m);

    world.add(Arc::new(Planar::quad(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        Arc::new(DiffuseLight::from_color(Color::splat(15.0))),
    )));

    let (tall, short) = cornell_blocks(&m.white);
    world.add(tall);
    world.add(short);

    Scene {
        world: Arc::new(world),
        camera: cornell_camera(600, 200, Vec3::new(278.0, 278.0, -800.0)),
        aspect_ratio: 1.0,
    }
}

fn cornell_smoke() -> Scene {
    let m = CornellMaterials::new();
    let mut world = HittableList::new();
    cornell_walls(&mut world, &m);

    world.add(Arc::new(Planar::quad(
        Vec3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        Arc::new(DiffuseLight::from_color(Color::splat(7.0))),
    )));

    let (tall, short) = cornell_blocks(&m.white);
    world.add(Arc::new(ConstantMedium::from_color(tall, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::from_color(short, 0.01, Color::ONE)));

    Scene {
        world: Arc::new(world),
        camera: cornell_camera(600, 200, Vec3::new(278.0, 278.0, -800.0)),
        aspect_ratio: 1.0,
    }
}

/// Everything at once: box field, moving sphere, glass, fog, textures and instanced spheres.
fn final_scene(rng: &mut dyn RngCore) -> Scene {
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));

    let boxes_per_side = 20;
    let mut boxes1 = HittableList::new();
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range_f32(rng, 1.0, 101.0);
            boxes1.add(Arc::new(make_box(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }

    let mut world = HittableList::new();
    world.add(Arc::new(BvhNode::new(boxes1)));

    world.add(Arc::new(Planar::quad(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        Arc::new(DiffuseLight::from_color(Color::splat(7.0))),
    )));

    let center1 = Vec3::new(400.0, 400.0, 200.0);
    let center2 = center1 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Arc::new(Sphere::moving(
        center1,
        center2,
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    )));

    world.add(Arc::new(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass ball filled with blue haze, and a thin mist over everything
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.add(Arc::new(ConstantMedium::from_color(
        boundary,
        0.2,
        Color::new(0.2, 0.4, 0.9),
    )));
    let mist: Arc<dyn Hittable> =
        Arc::new(Sphere::new(Vec3::ZERO, 5000.0, Arc::new(Dielectric::new(1.5))));
    world.add(Arc::new(ConstantMedium::from_color(mist, 0.0001, Color::ONE)));

    world.add(Arc::new(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        textured(Arc::new(ImageTexture::open(EARTH_IMAGE))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        textured(Arc::new(NoiseTexture::new(0.2, rng))),
    )));

    let white = lambertian(Color::splat(0.73));
    let mut boxes2 = HittableList::new();
    for _ in 0..1000 {
        boxes2.add(Arc::new(Sphere::new(
            random_vec3(rng, 0.0, 165.0),
            10.0,
            white.clone(),
        )));
    }
    let cluster = Arc::new(Rotate::y(Arc::new(BvhNode::new(boxes2)), 15.0));
    world.add(Arc::new(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0))));

    Scene {
        world: Arc::new(world),
        camera: Camera::new()
            .with_aspect_ratio(800, 1.0)
            .with_quality(10_000, 40)
            .with_background(Color::ZERO)
            .with_position(
                Vec3::new(478.0, 278.0, -600.0),
                Vec3::new(278.0, 278.0, 0.0),
                Vec3::Y,
            )
            .with_lens(40.0, 0.0, 10.0),
        aspect_ratio: 1.0,
    }
}
