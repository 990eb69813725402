use std::collections::HashMap;

use log::trace;

use crate::matrix::Matrix4x4;
use crate::point2d::Point2D;
use crate::point3d::{Point3D, VERTEX_EPSILON, cross3, normalize};

/// Planar, consistently wound face. Texture coordinates, when present, run
/// parallel to `points`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub points: Vec<Point3D>,
    pub tex_coords: Option<Vec<Point2D>>,
}

impl Polygon {
    pub fn new(points: Vec<Point3D>) -> Self {
        Self { points, tex_coords: None }
    }

    pub fn textured(points: Vec<Point3D>, tex_coords: Vec<Point2D>) -> Self {
        Self { points, tex_coords: Some(tex_coords) }
    }

    /// Texture coordinates, if there is exactly one per vertex.
    pub fn uvs(&self) -> Option<&[Point2D]> {
        self.tex_coords
            .as_deref()
            .filter(|uvs| uvs.len() == self.points.len())
    }

    /// Transforms every vertex in place. Texture coordinates are untouched.
    pub fn transform(&mut self, matrix: &Matrix4x4) {
        for point in &mut self.points {
            *point = matrix.transform(*point);
        }
    }

    /// Face normal from the first two edges; zero vector below 3 points.
    pub fn normal(&self) -> Point3D {
        if self.points.len() < 3 {
            return Point3D::ZERO;
        }
        let a = self.points[1] - self.points[0];
        let b = self.points[2] - self.points[0];
        normalize(cross3(a, b))
    }

    /// Fan triangulation from vertex 0. Only valid for convex polygons.
    pub fn fan(&self) -> impl Iterator<Item = [usize; 3]> {
        (1..self.points.len().saturating_sub(1)).map(|i| [0, i, i + 1])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyhedron {
    pub polygons: Vec<Polygon>,
}

impl Polyhedron {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn transform(&mut self, matrix: &Matrix4x4) {
        for polygon in &mut self.polygons {
            polygon.transform(matrix);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.points.len()).sum()
    }

    /// Mean of every vertex reference across all polygons (shared vertices
    /// count once per polygon). Origin for an empty mesh.
    pub fn center(&self) -> Point3D {
        let count = self.vertex_count();
        if count == 0 {
            return Point3D::ORIGIN;
        }
        let sum = self
            .polygons
            .iter()
            .flat_map(|p| p.points.iter())
            .fold(Point3D::ORIGIN, |acc, &p| acc + p);
        sum * (1.0 / count as f32)
    }
}

/// Position snapped to a grid of `VERTEX_EPSILON` cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct VertexKey(i64, i64, i64);

impl VertexKey {
    fn of(p: Point3D) -> Self {
        let snap = |v: f32| (v / VERTEX_EPSILON).round() as i64;
        VertexKey(snap(p.x), snap(p.y), snap(p.z))
    }
}

/// Averaged normal per distinct vertex position.
///
/// Vertices are shared by position only: two unrelated vertices at the same
/// coordinates get the same normal.
#[derive(Debug, Clone, Default)]
pub struct VertexNormals {
    normals: HashMap<VertexKey, Point3D>,
}

impl VertexNormals {
    /// Smoothed normal at `point`, zero vector if the mesh had no such vertex.
    pub fn get(&self, point: Point3D) -> Point3D {
        self.normals.get(&VertexKey::of(point)).copied().unwrap_or(Point3D::ZERO)
    }

    pub fn len(&self) -> usize {
        self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }
}

/// Sums each face normal into all of the face's vertices, then normalizes.
pub fn calculate_smooth_normals(mesh: &Polyhedron) -> VertexNormals {
    let mut normals: HashMap<VertexKey, Point3D> = HashMap::new();

    for polygon in &mesh.polygons {
        let face_normal = polygon.normal();
        for &point in &polygon.points {
            let entry = normals.entry(VertexKey::of(point)).or_insert(Point3D::ZERO);
            *entry = (*entry + face_normal).as_direction();
        }
    }

    for normal in normals.values_mut() {
        *normal = normalize(*normal);
    }

    trace!("smoothed normals for {} distinct vertices", normals.len());
    VertexNormals { normals }
}
