use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use image::Rgb;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use zbuffer_rasterizer::camera::OrbitCamera;
use zbuffer_rasterizer::matrix::Matrix4x4;
use zbuffer_rasterizer::mesh::Polyhedron;
use zbuffer_rasterizer::obj::load_obj;
use zbuffer_rasterizer::point3d::Point3D;
use zbuffer_rasterizer::rasterizer::Rasterizer;
use zbuffer_rasterizer::shading::{Light, ShadingMode};
use zbuffer_rasterizer::shapes;
use zbuffer_rasterizer::texture::Texture;
use zbuffer_rasterizer::transform::{Axis, perspective, rotation_x, rotation_y, scale, translation};

const DEFAULT_LOGGING_LEVEL: &str = "info";

const BASE_COLOR: Rgb<u8> = Rgb([90, 170, 255]);
const BACKGROUND: Rgb<u8> = Rgb([24, 24, 32]);

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Shape {
    Tetrahedron,
    Hexahedron,
    Octahedron,
    Icosahedron,
    /// Vase profile swept around Y.
    Vase,
    /// `z = sin(sqrt(x^2 + y^2))` height field.
    Ripple,
}

/// Radius and height pairs of the vase, bottom centre to top centre.
const VASE_PROFILE: [(f32, f32); 7] = [
    (0.0, 0.0),
    (0.1, 0.0),
    (0.15, 0.4),
    (0.4, 0.45),
    (0.5, 0.5),
    (0.3, 0.55),
    (0.0, 0.6),
];

impl Shape {
    fn build(self, segments: usize) -> Polyhedron {
        match self {
            Shape::Tetrahedron => shapes::tetrahedron(),
            Shape::Hexahedron => shapes::hexahedron(),
            Shape::Octahedron => shapes::octahedron(),
            Shape::Icosahedron => shapes::icosahedron(),
            Shape::Vase => {
                let profile: Vec<Point3D> = VASE_PROFILE
                    .iter()
                    .map(|&(r, y)| Point3D::new(r * 2.0, y * 2.0, 0.0))
                    .collect();
                shapes::surface_of_revolution(&profile, Axis::Y, segments)
            }
            Shape::Ripple => {
                let mut mesh = shapes::function_surface(|x, y| (x * x + y * y).sqrt().sin(), -6.0, 6.0, -6.0, 6.0, segments);
                // lay the height field flat under the camera, at unit size
                mesh.transform(&(scale(1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0) * rotation_x(-FRAC_PI_2)));
                mesh
            }
        }
    }
}

/// Renders one mesh with every shading mode and writes color and depth PNGs.
#[derive(Debug, Parser)]
#[command(version = clap::crate_version!())]
struct Args {
    /// Directory the images are written to.
    #[arg(short, long, default_value = "out")]
    output: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Built-in mesh, ignored when `--obj` is given.
    #[arg(long, value_enum, default_value_t = Shape::Icosahedron)]
    shape: Shape,

    /// Subdivisions of the vase and ripple surfaces.
    #[arg(long, default_value_t = 36)]
    segments: usize,

    /// Wavefront OBJ file to render instead of a built-in mesh.
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Texture image. A checkerboard is generated when absent.
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Horizontal orbit angle of the camera in degrees.
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    yaw: f32,

    /// Vertical orbit angle of the camera in degrees.
    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
    pitch: f32,

    /// Distance from the camera to the mesh center.
    #[arg(long, default_value_t = 3.0)]
    distance: f32,

    /// Extra rotation of the model around Y in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    spin: f32,

    #[arg(long, default_value_t = 1.0)]
    light_intensity: f32,

    /// Worker threads, defaults to the number of logical cores.
    #[arg(long)]
    threads: Option<usize>,

    /// Seed for the per-face palette of the flat render.
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

struct Scene<'a> {
    mesh: &'a Polyhedron,
    texture: &'a Texture,
    mvp: Matrix4x4,
    model: Matrix4x4,
    light: Light,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOGGING_LEVEL)).init();
    let args = Args::parse();

    if args.width == 0 || args.height == 0 {
        bail!("image size must be non-zero, got {}x{}", args.width, args.height);
    }

    let threads = args.threads.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("failed to build thread pool")?;
    info!("rendering on {threads} threads");

    let mesh = match &args.obj {
        Some(path) => load_obj(path)?,
        None => args.shape.build(args.segments),
    };
    if mesh.polygons.is_empty() {
        bail!("mesh has no polygons");
    }
    info!("mesh: {} polygons, {} vertices", mesh.polygons.len(), mesh.vertex_count());

    let texture = match &args.texture {
        Some(path) => Texture::load(path)?,
        None => Texture::checkerboard(256, 8, Rgb([235, 235, 235]), Rgb([200, 60, 40])),
    };

    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let center = mesh.center();
    let model = rotation_y(args.spin.to_radians()) * translation(-center.x, -center.y, -center.z);

    let mut camera = OrbitCamera::new(Point3D::new(0.0, 0.0, args.distance), Point3D::ORIGIN);
    camera.rotate_around_target(args.yaw.to_radians(), args.pitch.to_radians());
    debug!("camera at {:?}", camera.position);

    let aspect = args.width as f32 / args.height as f32;
    let projection = perspective(45f32.to_radians(), aspect, 0.1, 100.0);
    let mvp = projection * camera.view_matrix() * model;

    let scene = Scene {
        mesh: &mesh,
        texture: &texture,
        mvp,
        model,
        light: Light::white(Point3D::new(2.0, 3.0, 4.0), args.light_intensity),
    };

    let modes = [
        ShadingMode::Flat { color: BASE_COLOR, cull_backfaces: true },
        ShadingMode::Textured { cull_backfaces: true },
        ShadingMode::Gouraud { color: BASE_COLOR },
        ShadingMode::Toon { color: BASE_COLOR },
    ];

    let start = Instant::now();
    modes
        .par_iter()
        .try_for_each(|mode| render_mode(&scene, mode, args.width, args.height, &args.output))?;
    render_palette(&scene, args.width, args.height, args.seed, &args.output)?;
    info!("rendered {} images in {:.2?}", modes.len() + 1, start.elapsed());

    Ok(())
}

fn render_mode(scene: &Scene, mode: &ShadingMode, width: u32, height: u32, out_dir: &Path) -> Result<()> {
    let start = Instant::now();
    let mut rasterizer = Rasterizer::with_background(width, height, BACKGROUND);
    rasterizer.bind_texture(scene.texture);
    rasterizer.draw_polyhedron(scene.mesh, mode, &scene.mvp, &scene.model, &scene.light);
    debug!("{} pass took {:.2?}", mode.name(), start.elapsed());

    save(&rasterizer, mode.name(), out_dir)
}

/// Flat render with a random color per face, which makes the depth test
/// between neighbouring faces visible.
fn render_palette(scene: &Scene, width: u32, height: u32, seed: u64, out_dir: &Path) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rasterizer = Rasterizer::with_background(width, height, BACKGROUND);
    for polygon in &scene.mesh.polygons {
        let color = Rgb([rng.gen_range(64..=255), rng.gen_range(64..=255), rng.gen_range(64..=255)]);
        rasterizer.rasterize_polygon(polygon, color, &scene.mvp, true);
    }
    save(&rasterizer, "palette", out_dir)
}

fn save(rasterizer: &Rasterizer, name: &str, out_dir: &Path) -> Result<()> {
    let color_path = out_dir.join(format!("{name}.png"));
    rasterizer
        .color_image()
        .save(&color_path)
        .with_context(|| format!("failed to write {}", color_path.display()))?;

    let depth_path = out_dir.join(format!("{name}_depth.png"));
    rasterizer
        .depth_image()
        .save(&depth_path)
        .with_context(|| format!("failed to write {}", depth_path.display()))?;

    info!("saved {} and {}", color_path.display(), depth_path.display());
    Ok(())
}
