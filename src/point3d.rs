use std::ops::{Add, Sub, Mul, Neg};

/// Distance under which two vertex positions count as the same vertex.
/// Only vertex deduplication (smooth normals) uses it.
pub const VERTEX_EPSILON: f32 = 1e-5;

/// Homogeneous point. `w` is 1 for positions and 0 for directions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Point3D {
    fn default() -> Self {
        Point3D::new(0.0, 0.0, 0.0)
    }
}

impl Point3D {
    pub const ORIGIN: Point3D = Point3D { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };
    pub const ZERO: Point3D = Point3D { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Point3D { x, y, z, w: 1.0 }
    }

    pub const fn direction(x: f32, y: f32, z: f32) -> Self {
        Point3D { x, y, z, w: 0.0 }
    }

    /// Same x, y, z with `w = 0`, so a matrix transform ignores translation.
    pub const fn as_direction(self) -> Self {
        Point3D { w: 0.0, ..self }
    }

    pub fn length(self) -> f32 {
        dot3(self, self).sqrt()
    }

    pub fn approx_eq(self, other: Point3D) -> bool {
        (self.x - other.x).abs() <= VERTEX_EPSILON
            && (self.y - other.y).abs() <= VERTEX_EPSILON
            && (self.z - other.z).abs() <= VERTEX_EPSILON
    }
}

// Arithmetic works on x, y, z and always yields a position (w = 1).

impl Add for Point3D {
    type Output = Point3D;
    fn add(self, other: Point3D) -> Point3D {
        Point3D::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Point3D {
    type Output = Point3D;
    fn sub(self, other: Point3D) -> Point3D {
        Point3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Point3D {
    type Output = Point3D;
    fn mul(self, scalar: f32) -> Point3D {
        Point3D::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Neg for Point3D {
    type Output = Point3D;
    fn neg(self) -> Point3D {
        Point3D { x: -self.x, y: -self.y, z: -self.z, w: self.w }
    }
}

pub fn dot3(a: Point3D, b: Point3D) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

pub fn cross3(a: Point3D, b: Point3D) -> Point3D {
    Point3D::direction(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

/// Unit-length direction, or the zero vector when `vec` has no length.
pub fn normalize(vec: Point3D) -> Point3D {
    let length = vec.length();
    if length != 0.0 {
        Point3D::direction(vec.x / length, vec.y / length, vec.z / length)
    } else {
        Point3D::ZERO
    }
}

/// Blend three points with barycentric weights stored in `weights.x/y/z`.
#[inline(always)]
pub fn blend3(a: Point3D, b: Point3D, c: Point3D, weights: Point3D) -> Point3D {
    a * weights.x + b * weights.y + c * weights.z
}
