use std::ops::{Add, Sub, Mul};

use crate::point3d::Point3D;

/// Texture coordinate or plain 2D vector.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, other: Point2D) -> Point2D {
        Point2D { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, other: Point2D) -> Point2D {
        Point2D { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f32> for Point2D {
    type Output = Point2D;
    fn mul(self, scalar: f32) -> Point2D {
        Point2D { x: self.x * scalar, y: self.y * scalar }
    }
}

/// Blend three coordinates with barycentric weights stored in `weights.x/y/z`.
#[inline(always)]
pub fn blend2(a: Point2D, b: Point2D, c: Point2D, weights: Point3D) -> Point2D {
    a * weights.x + b * weights.y + c * weights.z
}
