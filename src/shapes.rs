//! Regular polyhedra centred near the origin, surfaces of revolution and
//! height-field surfaces. Faces are wound counter-clockwise as seen from
//! outside and carry texture coordinates.

use crate::mesh::{Polygon, Polyhedron};
use crate::point2d::Point2D;
use crate::point3d::{Point3D, cross3, dot3};
use crate::transform::{Axis, rotation_x, rotation_y, rotation_z};

const UNIT_SQUARE_UVS: [Point2D; 4] = [
    Point2D::new(0.0, 0.0),
    Point2D::new(1.0, 0.0),
    Point2D::new(1.0, 1.0),
    Point2D::new(0.0, 1.0),
];

/// Builds one triangular face with planar UVs, flipping its winding if the
/// face normal points towards `center`.
fn outward_face(vertices: &[Point3D], idx: [usize; 3], center: Point3D) -> Polygon {
    let mut points: Vec<Point3D> = idx.iter().map(|&i| vertices[i]).collect();
    let normal = cross3(points[1] - points[0], points[2] - points[0]);
    let face_center = (points[0] + points[1] + points[2]) * (1.0 / 3.0);
    if dot3(normal, face_center - center) < 0.0 {
        points.swap(1, 2);
    }
    let uvs = points
        .iter()
        .map(|p| Point2D::new((p.x + 1.0) / 2.0, (p.y + 1.0) / 2.0))
        .collect();
    Polygon::textured(points, uvs)
}

fn triangle_mesh(vertices: &[Point3D], faces: &[[usize; 3]]) -> Polyhedron {
    let center = vertices.iter().fold(Point3D::ORIGIN, |acc, &v| acc + v) * (1.0 / vertices.len() as f32);
    Polyhedron::new(faces.iter().map(|&f| outward_face(vertices, f, center)).collect())
}

pub fn tetrahedron() -> Polyhedron {
    let vertices = [
        Point3D::new(0.0, 1.0, 0.0),
        Point3D::new(-0.866, -0.5, 0.0),
        Point3D::new(0.866, -0.5, 0.0),
        Point3D::new(0.0, 0.0, 1.414),
    ]
    .map(|v| v * 0.5);
    triangle_mesh(&vertices, &[[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]])
}

/// Cube of edge 1.4 with a full unit-square texture on every face.
pub fn hexahedron() -> Polyhedron {
    let h = 0.7;
    let vertices = [
        Point3D::new(-h, -h, -h),
        Point3D::new(h, -h, -h),
        Point3D::new(h, h, -h),
        Point3D::new(-h, h, -h),
        Point3D::new(-h, -h, h),
        Point3D::new(h, -h, h),
        Point3D::new(h, h, h),
        Point3D::new(-h, h, h),
    ];
    let faces: [[usize; 4]; 6] = [
        [3, 2, 1, 0], // back
        [4, 5, 6, 7], // front
        [0, 1, 5, 4], // bottom
        [2, 3, 7, 6], // top
        [0, 4, 7, 3], // left
        [1, 2, 6, 5], // right
    ];
    Polyhedron::new(
        faces
            .iter()
            .map(|face| Polygon::textured(face.iter().map(|&i| vertices[i]).collect(), UNIT_SQUARE_UVS.to_vec()))
            .collect(),
    )
}

pub fn octahedron() -> Polyhedron {
    let vertices = [
        Point3D::new(0.0, 1.0, 0.0),
        Point3D::new(1.0, 0.0, 0.0),
        Point3D::new(0.0, 0.0, 1.0),
        Point3D::new(-1.0, 0.0, 0.0),
        Point3D::new(0.0, 0.0, -1.0),
        Point3D::new(0.0, -1.0, 0.0),
    ]
    .map(|v| v * 0.5);
    triangle_mesh(
        &vertices,
        &[
            [0, 2, 1], [0, 3, 2], [0, 4, 3], [0, 1, 4],
            [5, 1, 2], [5, 2, 3], [5, 3, 4], [5, 4, 1],
        ],
    )
}

pub fn icosahedron() -> Polyhedron {
    let phi = (1.0 + 5.0f32.sqrt()) / 2.0;
    let a = 1.0;
    let b = 1.0 / phi;
    let vertices = [
        Point3D::new(0.0, b, -a),
        Point3D::new(b, a, 0.0),
        Point3D::new(-b, a, 0.0),
        Point3D::new(0.0, b, a),
        Point3D::new(0.0, -b, a),
        Point3D::new(-a, 0.0, b),
        Point3D::new(0.0, -b, -a),
        Point3D::new(a, 0.0, -b),
        Point3D::new(a, 0.0, b),
        Point3D::new(-a, 0.0, -b),
        Point3D::new(b, -a, 0.0),
        Point3D::new(-b, -a, 0.0),
    ]
    .map(|v| v * 0.5);
    triangle_mesh(
        &vertices,
        &[
            [0, 1, 2], [3, 2, 1], [3, 4, 5], [3, 8, 4],
            [0, 6, 7], [0, 9, 6], [4, 10, 11], [6, 11, 10],
            [2, 5, 9], [11, 9, 5], [1, 7, 8], [10, 8, 7],
            [3, 5, 2], [3, 1, 8], [0, 2, 9], [0, 7, 1],
            [6, 9, 11], [6, 10, 7], [4, 11, 5], [4, 8, 10],
        ],
    )
}

/// Sweeps `profile` around `axis` through a full turn in `segments` steps,
/// giving `segments * (profile.len() - 1)` quads.
///
/// Faces point outward when the profile runs along the positive axis on the
/// side of the next axis in X, Y, Z order (e.g. `(r, y, 0)` with growing `y`
/// for `Axis::Y`). `u` follows the sweep, `v` follows the profile.
pub fn surface_of_revolution(profile: &[Point3D], axis: Axis, segments: usize) -> Polyhedron {
    if profile.len() < 2 || segments == 0 {
        return Polyhedron::default();
    }
    let rotation = match axis {
        Axis::X => rotation_x,
        Axis::Y => rotation_y,
        Axis::Z => rotation_z,
    };
    let step = std::f32::consts::TAU / segments as f32;
    let v_step = 1.0 / (profile.len() - 1) as f32;

    // rings[i][j]: profile point j after i steps; the last ring closes the loop
    let rings: Vec<Vec<Point3D>> = (0..=segments)
        .map(|i| {
            let matrix = rotation((i % segments) as f32 * step);
            profile.iter().map(|&p| matrix.transform(p)).collect()
        })
        .collect();

    let mut polygons = Vec::with_capacity(segments * (profile.len() - 1));
    for i in 0..segments {
        let u1 = i as f32 / segments as f32;
        let u2 = (i + 1) as f32 / segments as f32;
        for j in 0..profile.len() - 1 {
            let v1 = j as f32 * v_step;
            let v2 = (j + 1) as f32 * v_step;
            polygons.push(Polygon::textured(
                vec![rings[i][j], rings[i + 1][j], rings[i + 1][j + 1], rings[i][j + 1]],
                vec![
                    Point2D::new(u1, v1),
                    Point2D::new(u2, v1),
                    Point2D::new(u2, v2),
                    Point2D::new(u1, v2),
                ],
            ));
        }
    }
    Polyhedron::new(polygons)
}

/// Height field `z = f(x, y)` over `[x0, x1] x [y0, y1]` as a `steps` x
/// `steps` grid of quads facing +Z. UVs span the unit square, `u` along x.
pub fn function_surface<F>(f: F, x0: f32, x1: f32, y0: f32, y1: f32, steps: usize) -> Polyhedron
where
    F: Fn(f32, f32) -> f32,
{
    if steps == 0 {
        return Polyhedron::default();
    }
    let dx = (x1 - x0) / steps as f32;
    let dy = (y1 - y0) / steps as f32;
    let point = |i: usize, j: usize| {
        let (x, y) = (x0 + i as f32 * dx, y0 + j as f32 * dy);
        Point3D::new(x, y, f(x, y))
    };
    let grid: Vec<Vec<Point3D>> = (0..=steps).map(|i| (0..=steps).map(|j| point(i, j)).collect()).collect();

    let mut polygons = Vec::with_capacity(steps * steps);
    for i in 0..steps {
        let u1 = i as f32 / steps as f32;
        let u2 = (i + 1) as f32 / steps as f32;
        for j in 0..steps {
            let v1 = j as f32 / steps as f32;
            let v2 = (j + 1) as f32 / steps as f32;
            polygons.push(Polygon::textured(
                vec![grid[i][j], grid[i + 1][j], grid[i + 1][j + 1], grid[i][j + 1]],
                vec![
                    Point2D::new(u1, v1),
                    Point2D::new(u2, v1),
                    Point2D::new(u2, v2),
                    Point2D::new(u1, v2),
                ],
            ));
        }
    }
    Polyhedron::new(polygons)
}
