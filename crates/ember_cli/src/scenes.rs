//! Built-in demo scenes.

use crate::mesh::load_obj;
use crate::settings::RenderSettings;
use anyhow::{Context, Result};
use clap::ValueEnum;
use ember_tracer::{
    cuboid, Background, Camera, Color, ConstantMedium, ImageTexture, Material, Perlin,
    PrimitiveId, Quad, Rotate, SceneBuilder, Sphere, Texture, Translate, Triangle, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Cornell box with a rotated box and a glass sphere
    Cornell,
    /// Cornell box with two boxes of smoke
    CornellSmoke,
    /// Random spheres with motion blur over a checker ground
    Spheres,
    /// Triangles (or an OBJ mesh) in a Cornell box
    Triangles,
    /// Textured globe under a sky
    Earth,
    /// Marble noise spheres lit by a sphere and a quad
    Perlin,
    /// Every feature at once: boxes, media, motion, glass, metal and textures
    Final,
}

/// Files a scene may pull in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneInputs<'a> {
    /// OBJ mesh for [`SceneKind::Triangles`]
    pub mesh: Option<&'a Path>,
    /// Globe image for [`SceneKind::Earth`] and [`SceneKind::Final`]
    pub texture: Option<&'a Path>,
}

/// A scene ready to build, with its camera and preferred settings.
pub struct SceneSetup {
    pub builder: SceneBuilder,
    /// Camera placement; resolution is applied by the caller.
    pub camera: Camera,
    pub defaults: RenderSettings,
}

/// Assemble the requested scene.
pub fn build(kind: SceneKind, inputs: SceneInputs<'_>) -> Result<SceneSetup> {
    let setup = match kind {
        SceneKind::Cornell => cornell(),
        SceneKind::CornellSmoke => cornell_smoke(),
        SceneKind::Spheres => spheres(),
        SceneKind::Triangles => triangles(inputs.mesh)?,
        SceneKind::Earth => earth(inputs.texture)?,
        SceneKind::Perlin => perlin(),
        SceneKind::Final => final_scene(inputs.texture)?,
    };
    log::info!("Assembled {:?} scene ({} primitives)", kind, setup.builder.len());
    Ok(setup)
}

fn lambertian(color: Color) -> Arc<Material> {
    Arc::new(Material::lambertian(color))
}

fn cornell_camera() -> Camera {
    Camera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
}

fn wide_defaults(samples: u32, depth: u32) -> RenderSettings {
    RenderSettings {
        width: Some(800),
        height: Some(450),
        samples_per_pixel: Some(samples),
        max_depth: Some(depth),
        ..Default::default()
    }
}

fn square_defaults(size: u32, samples: u32) -> RenderSettings {
    RenderSettings {
        width: Some(size),
        height: Some(size),
        samples_per_pixel: Some(samples),
        max_depth: Some(50),
        ..Default::default()
    }
}

/// Red and green side walls, white floor, ceiling and back wall.
fn cornell_walls(builder: &mut SceneBuilder, white: &Arc<Material>) {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));

    builder.add(Quad::new(Vec3::new(555.0, 0.0, 0.0), 555.0 * Vec3::Y, 555.0 * Vec3::Z, green));
    builder.add(Quad::new(Vec3::ZERO, 555.0 * Vec3::Y, 555.0 * Vec3::Z, red));
    builder.add(Quad::new(Vec3::ZERO, 555.0 * Vec3::X, 555.0 * Vec3::Z, white.clone()));
    builder.add(Quad::new(
        Vec3::splat(555.0),
        -555.0 * Vec3::X,
        -555.0 * Vec3::Z,
        white.clone(),
    ));
    builder.add(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        555.0 * Vec3::X,
        555.0 * Vec3::Y,
        white.clone(),
    ));
}

/// Ceiling lamp facing down into the box.
fn ceiling_light(
    builder: &mut SceneBuilder,
    corner: Vec3,
    size: (f32, f32),
    radiance: f32,
) -> PrimitiveId {
    builder.add_light(Quad::new(
        corner,
        size.0 * Vec3::X,
        size.1 * Vec3::Z,
        Arc::new(Material::diffuse_light(Color::splat(radiance))),
    ))
}

fn tall_box(material: Arc<Material>) -> Translate {
    let shape = cuboid(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), material);
    Translate::new(Rotate::y(shape, 15.0), Vec3::new(265.0, 0.0, 295.0))
}

fn short_box(material: Arc<Material>) -> Translate {
    let shape = cuboid(Vec3::ZERO, Vec3::splat(165.0), material);
    Translate::new(Rotate::y(shape, -18.0), Vec3::new(130.0, 0.0, 65.0))
}

fn cornell() -> SceneSetup {
    let mut builder = SceneBuilder::new();
    let white = lambertian(Color::splat(0.73));

    cornell_walls(&mut builder, &white);
    ceiling_light(&mut builder, Vec3::new(213.0, 554.0, 227.0), (130.0, 105.0), 15.0);
    builder.add(tall_box(white));

    // The glass sphere is sampled too, so caustics through it converge.
    let glass = builder.add(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        Arc::new(Material::dielectric(1.5)),
    ));
    builder.mark_light(glass);

    SceneSetup {
        builder,
        camera: cornell_camera(),
        defaults: square_defaults(600, 100),
    }
}

fn cornell_smoke() -> SceneSetup {
    let mut builder = SceneBuilder::new();
    let white = lambertian(Color::splat(0.73));

    cornell_walls(&mut builder, &white);
    ceiling_light(&mut builder, Vec3::new(113.0, 554.0, 127.0), (330.0, 305.0), 7.0);
    builder.add(ConstantMedium::new(tall_box(white.clone()), 0.01, Color::ZERO));
    builder.add(ConstantMedium::new(short_box(white), 0.01, Color::ONE));

    SceneSetup {
        builder,
        camera: cornell_camera(),
        defaults: square_defaults(600, 200),
    }
}

fn spheres() -> SceneSetup {
    let mut builder = SceneBuilder::new();
    // Layout is fixed; the render seed only drives sampling.
    let mut rng = StdRng::seed_from_u64(0x5EED);

    let checker = Texture::checker(0.32, Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
    builder.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Material::lambertian(checker)),
    ));

    for a in -8..8 {
        for b in -8..8 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                let end = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                builder.add(Sphere::moving(center, end, 0.2, lambertian(albedo)));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                let fuzz = rng.gen_range(0.0..0.5);
                builder.add(Sphere::new(center, 0.2, Arc::new(Material::metal(albedo, fuzz))));
            } else {
                builder.add(Sphere::new(center, 0.2, Arc::new(Material::dielectric(1.5))));
            }
        }
    }

    builder.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Material::dielectric(1.5))));
    builder.add(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, lambertian(Color::new(0.4, 0.2, 0.1))));
    builder.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));
    builder.add_light(Sphere::new(
        Vec3::new(0.0, 7.0, 2.0),
        2.0,
        Arc::new(Material::diffuse_light(Color::splat(4.0))),
    ));
    builder.background(Background::Solid(Color::new(0.07, 0.08, 0.1)));

    let camera = Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0);

    SceneSetup {
        builder,
        camera,
        defaults: wide_defaults(64, 20),
    }
}

fn triangles(mesh: Option<&Path>) -> Result<SceneSetup> {
    let mut builder = SceneBuilder::new();
    let white = lambertian(Color::splat(0.73));

    cornell_walls(&mut builder, &white);
    ceiling_light(&mut builder, Vec3::new(213.0, 554.0, 227.0), (130.0, 105.0), 19.0);

    let aluminum = Arc::new(Material::metal(Color::new(0.8, 0.85, 0.88), 0.4));
    match mesh {
        Some(path) => {
            builder.add(load_obj(path, 4.0, Vec3::new(278.0, 10.0, 278.0), aluminum)?);
        }
        None => {
            // Flat pyramid on the floor
            let apex = Vec3::new(370.0, 260.0, 330.0);
            let base = [
                Vec3::new(290.0, 0.0, 250.0),
                Vec3::new(450.0, 0.0, 250.0),
                Vec3::new(450.0, 0.0, 410.0),
                Vec3::new(290.0, 0.0, 410.0),
            ];
            for i in 0..4 {
                builder.add(Triangle::new(base[i], base[(i + 1) % 4], apex, aluminum.clone()));
            }

            // Smooth-shaded panel leaning on the left wall
            let panel = [
                Vec3::new(60.0, 0.0, 120.0),
                Vec3::new(220.0, 0.0, 160.0),
                Vec3::new(100.0, 300.0, 300.0),
            ];
            let normals = [
                Vec3::new(-0.3, 0.2, -1.0),
                Vec3::new(0.3, 0.2, -1.0),
                Vec3::new(0.0, 0.6, -1.0),
            ];
            builder.add(Triangle::smooth(
                panel,
                normals,
                lambertian(Color::new(0.2, 0.3, 0.7)),
            ));
        }
    }

    Ok(SceneSetup {
        builder,
        camera: cornell_camera(),
        defaults: square_defaults(600, 100),
    })
}

/// Globe texture: the image at `path`, or a generated map when none is given.
fn globe_texture(path: Option<&Path>) -> Result<Texture> {
    let image = match path {
        Some(path) => ImageTexture::load(path)
            .with_context(|| format!("Failed to load texture {}", path.display()))?,
        None => generated_globe()?,
    };
    Ok(Texture::Image(Arc::new(image)))
}

/// Equirectangular map with noise continents, open ocean and polar ice.
fn generated_globe() -> Result<ImageTexture> {
    let (width, height) = (512u32, 256u32);
    let noise = Perlin::new(&mut StdRng::seed_from_u64(0xEA27));

    let ocean = Color::new(0.05, 0.15, 0.45);
    let land = Color::new(0.25, 0.45, 0.15);
    let ice = Color::splat(0.9);

    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for j in 0..height {
        // Row 0 is the north pole
        let theta = PI * (j as f32 + 0.5) / height as f32;
        for i in 0..width {
            let phi = 2.0 * PI * (i as f32 + 0.5) / width as f32;
            // Sample noise on the sphere itself so the map has no seam
            let p = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            let color = if p.y.abs() > 0.92 {
                ice
            } else if noise.turbulence(3.0 * p, 4) > 1.0 {
                land
            } else {
                ocean
            };
            data.extend_from_slice(&color.to_array());
        }
    }

    ImageTexture::from_rgb(width, height, data).context("Generated globe has the wrong size")
}

fn earth(texture: Option<&Path>) -> Result<SceneSetup> {
    let mut builder = SceneBuilder::new();
    let surface = Arc::new(Material::lambertian(globe_texture(texture)?));
    builder.add(Sphere::new(Vec3::ZERO, 2.0, surface));

    // Sun behind the camera
    builder.add_light(Sphere::new(
        Vec3::new(-20.0, 15.0, 20.0),
        5.0,
        Arc::new(Material::diffuse_light(Color::splat(6.0))),
    ));
    builder.background(Background::Solid(Color::new(0.7, 0.8, 1.0)));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    Ok(SceneSetup {
        builder,
        camera,
        defaults: wide_defaults(100, 50),
    })
}

fn perlin() -> SceneSetup {
    let mut builder = SceneBuilder::new();
    let marble = Arc::new(Material::lambertian(Texture::noise(
        4.0,
        &mut StdRng::seed_from_u64(0x9E71),
    )));

    builder.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone()));
    builder.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble));

    let lamp = Arc::new(Material::diffuse_light(Color::splat(4.0)));
    builder.add_light(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, lamp.clone()));
    builder.add_light(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        2.0 * Vec3::X,
        2.0 * Vec3::Y,
        lamp,
    ));

    let camera = Camera::new()
        .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    SceneSetup {
        builder,
        camera,
        defaults: wide_defaults(100, 50),
    }
}

fn final_scene(texture: Option<&Path>) -> Result<SceneSetup> {
    let mut builder = SceneBuilder::new();
    // Layout is fixed; the render seed only drives sampling.
    let mut rng = StdRng::seed_from_u64(0xF1A1);

    // Floor of boxes with random heights
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));
    let boxes_per_side = 20;
    let w = 100.0;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = rng.gen_range(1.0..101.0);
            builder.add(cuboid(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            ));
        }
    }

    ceiling_light(&mut builder, Vec3::new(123.0, 554.0, 147.0), (300.0, 265.0), 7.0);

    let center = Vec3::new(400.0, 400.0, 200.0);
    builder.add(Sphere::moving(
        center,
        center + Vec3::new(30.0, 0.0, 0.0),
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    ));

    let glass = Arc::new(Material::dielectric(1.5));
    builder.add(Sphere::new(Vec3::new(260.0, 150.0, 45.0), 50.0, glass.clone()));
    builder.add(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Material::metal(Color::new(0.8, 0.8, 0.9), 1.0)),
    ));

    // Glass shell filled with blue subsurface haze
    let shell = Sphere::new(Vec3::new(360.0, 150.0, 145.0), 70.0, glass.clone());
    builder.add(shell.clone());
    builder.add(ConstantMedium::new(shell, 0.2, Color::new(0.2, 0.4, 0.9)));

    // Thin fog over everything
    builder.add(ConstantMedium::new(
        Sphere::new(Vec3::ZERO, 5000.0, glass),
        0.0001,
        Color::ONE,
    ));

    let globe = Arc::new(Material::lambertian(globe_texture(texture)?));
    builder.add(Sphere::new(Vec3::new(400.0, 200.0, 400.0), 100.0, globe));

    let marble = Arc::new(Material::lambertian(Texture::noise(0.2, &mut rng)));
    builder.add(Sphere::new(Vec3::new(220.0, 280.0, 300.0), 80.0, marble));

    // Cluster of small spheres, turned and lifted as a group
    let white = lambertian(Color::splat(0.73));
    let offset = Vec3::new(-100.0, 270.0, 395.0);
    for _ in 0..1000 {
        let center = Vec3::new(
            rng.gen_range(0.0..165.0),
            rng.gen_range(0.0..165.0),
            rng.gen_range(0.0..165.0),
        );
        let sphere = Sphere::new(center, 10.0, white.clone());
        builder.add(Translate::new(Rotate::y(sphere, 15.0), offset));
    }

    let camera = Camera::new()
        .with_position(
            Vec3::new(478.0, 278.0, -600.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0);

    Ok(SceneSetup {
        builder,
        camera,
        defaults: RenderSettings {
            max_depth: Some(40),
            ..square_defaults(800, 100)
        },
    })
}
