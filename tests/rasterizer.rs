use image::Rgb;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use zbuffer_rasterizer::geometry::{ScreenVertex, ndc_to_screen};
use zbuffer_rasterizer::matrix::Matrix4x4;
use zbuffer_rasterizer::mesh::calculate_smooth_normals;
use zbuffer_rasterizer::point3d::Point3D;
use zbuffer_rasterizer::rasterizer::Rasterizer;
use zbuffer_rasterizer::shapes;
use zbuffer_rasterizer::texture::Texture;

const RED: Rgb<u8> = Rgb([255, 0, 0]);
const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Pixel position on a 300x300 target expressed in NDC.
fn screen_point(sx: f32, sy: f32, z: f32) -> Point3D {
    Point3D::new(sx / 150.0 - 1.0, 1.0 - sy / 150.0, z)
}

fn reference_triangle() -> [Point3D; 3] {
    [
        screen_point(100.0, 100.0, 0.5),
        screen_point(200.0, 100.0, 0.5),
        screen_point(150.0, 200.0, 0.9),
    ]
}

/// Exact integer coverage test on pixel-space vertices, edges inclusive.
fn inside(verts: [ScreenVertex; 3], x: i64, y: i64) -> bool {
    let [a, b, c] = verts.map(|v| (v.x as i64, v.y as i64));
    let edge = |p: (i64, i64), q: (i64, i64)| (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0);
    let (e1, e2, e3) = (edge(a, b), edge(b, c), edge(c, a));
    (e1 >= 0 && e2 >= 0 && e3 >= 0) || (e1 <= 0 && e2 <= 0 && e3 <= 0)
}

#[test]
fn single_triangle_on_300x300() {
    let mut r = Rasterizer::with_background(300, 300, BACKGROUND);
    r.rasterize_triangle(reference_triangle(), RED, &Matrix4x4::IDENTITY, false);
    let frame = r.frame();
    let verts = reference_triangle().map(|p| ndc_to_screen(p, 300, 300));

    let mut covered = 0;
    for y in 0..300 {
        for x in 0..300 {
            let z = frame.get_depth(x, y);
            if inside(verts, x as i64, y as i64) {
                covered += 1;
                assert_eq!(frame.get_pixel(x, y), Some(RED), "({x}, {y})");
                assert!((0.5 - 1e-6..=0.9 + 1e-6).contains(&z), "depth {z} at ({x}, {y})");
            } else {
                assert_eq!(frame.get_pixel(x, y), Some(BACKGROUND), "({x}, {y})");
                assert_eq!(z, f32::INFINITY, "({x}, {y})");
            }
        }
    }
    // Roughly half of the 100x100 bounding box.
    assert!((4500..5500).contains(&covered), "{covered}");
}

#[test]
fn huge_triangle_covers_the_whole_image() {
    let mut r = Rasterizer::with_background(300, 300, BACKGROUND);
    let huge = [
        Point3D::new(-1e10, -1e10, 0.5),
        Point3D::new(1e10, -1e10, 0.5),
        Point3D::new(0.0, 1e10, 0.5),
    ];
    r.rasterize_triangle(huge, RED, &Matrix4x4::IDENTITY, false);

    for y in 0..300 {
        for x in 0..300 {
            assert_eq!(r.frame().get_pixel(x, y), Some(RED), "({x}, {y})");
            assert!((r.frame().get_depth(x, y) - 0.5).abs() < 1e-4);
        }
    }
}

#[test]
fn depth_grows_towards_the_far_vertex() {
    let mut r = Rasterizer::new(300, 300);
    r.rasterize_triangle(reference_triangle(), RED, &Matrix4x4::IDENTITY, false);
    let near = r.frame().get_depth(150, 105);
    let far = r.frame().get_depth(150, 195);
    assert!(near < far);

    let depth = r.depth_image();
    assert!(depth.get_pixel(150, 105)[0] < depth.get_pixel(150, 195)[0]);
    assert_eq!(depth.get_pixel(10, 10), &Rgb([0, 0, 0]));
}

#[test]
fn backface_culling_follows_winding() {
    // Clockwise on screen.
    let [a, b, c] = reference_triangle();

    let mut culled = Rasterizer::new(300, 300);
    culled.rasterize_triangle([a, b, c], RED, &Matrix4x4::IDENTITY, true);
    assert_eq!(culled.frame().get_pixel(150, 150), Some(BACKGROUND));

    let mut kept = Rasterizer::new(300, 300);
    kept.rasterize_triangle([a, c, b], RED, &Matrix4x4::IDENTITY, true);
    assert_eq!(kept.frame().get_pixel(150, 150), Some(RED));
}

#[test]
fn clear_is_idempotent() {
    let mut r = Rasterizer::with_background(64, 48, Rgb([12, 34, 56]));
    let fresh = r.frame().clone();

    r.rasterize_triangle(reference_triangle(), RED, &Matrix4x4::IDENTITY, false);
    r.clear();
    assert_eq!(r.frame(), &fresh);
    r.clear();
    assert_eq!(r.frame(), &fresh);
}

#[test]
fn draw_order_does_not_change_the_frame() {
    let mut rng = StdRng::seed_from_u64(42);

    // Constant depth per triangle, all distinct, so every pixel has one
    // unambiguous nearest triangle.
    let mut triangles: Vec<([Point3D; 3], Rgb<u8>)> = (0..12)
        .map(|i| {
            let z = -0.9 + i as f32 * 0.15;
            let mut corner = || Point3D::new(rng.gen_range(-1.2..1.2), rng.gen_range(-1.2..1.2), z);
            let points = [corner(), corner(), corner()];
            (points, Rgb([rng.r#gen(), rng.r#gen(), rng.r#gen()]))
        })
        .collect();

    let render = |tris: &[([Point3D; 3], Rgb<u8>)]| {
        let mut r = Rasterizer::new(120, 80);
        for (points, color) in tris {
            r.rasterize_triangle(*points, *color, &Matrix4x4::IDENTITY, false);
        }
        r.frame().clone()
    };

    let reference = render(&triangles);
    for _ in 0..8 {
        triangles.shuffle(&mut rng);
        assert_eq!(render(&triangles), reference);
    }
}

#[test]
fn cube_corners_get_diagonal_normals() {
    let cube = shapes::hexahedron();
    let normals = calculate_smooth_normals(&cube);
    assert_eq!(normals.len(), 8);

    let corner = normals.get(Point3D::new(0.7, 0.7, 0.7));
    let expected = 1.0 / 3.0f32.sqrt();
    for c in [corner.x, corner.y, corner.z] {
        assert!((c - expected).abs() < 1e-5, "{corner:?}");
    }

    let opposite = normals.get(Point3D::new(-0.7, -0.7, -0.7));
    assert!((opposite.x + expected).abs() < 1e-5);
}

#[test]
fn texture_coordinates_wrap() {
    let a = Rgb([255, 255, 255]);
    let b = Rgb([0, 0, 255]);
    let tex = Texture::checkerboard(4, 2, a, b);

    assert_eq!(tex.sample(0.1, 0.1), a);
    assert_eq!(tex.sample(0.9, 0.1), b);
    assert_eq!(tex.sample(1.1, 0.1), tex.sample(0.1, 0.1));
    assert_eq!(tex.sample(-0.9, 0.1), tex.sample(0.1, 0.1));
    assert_eq!(tex.sample(0.9, -1.9), tex.sample(0.9, 0.1));
}
