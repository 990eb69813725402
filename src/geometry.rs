use crate::point3d::{Point3D, dot3};
use crate::rectangle::Rect;

/// Vertex after viewport mapping: integer pixel position, NDC depth.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenVertex {
    pub x: i32,
    pub y: i32,
    pub z: f32,
}

/// Divides x, y, z by w unless w is 0.
#[inline(always)]
pub fn perspective_divide(p: Point3D) -> Point3D {
    if p.w != 0.0 {
        Point3D { x: p.x / p.w, y: p.y / p.w, z: p.z / p.w, w: 1.0 }
    } else {
        p
    }
}

/// Maps NDC x, y in [-1, 1] to pixel coordinates. Y is flipped because row 0
/// is the top of the image; coordinates truncate toward zero.
#[inline(always)]
pub fn ndc_to_screen(v: Point3D, width: u32, height: u32) -> ScreenVertex {
    ScreenVertex {
        x: ((v.x + 1.0) * width as f32 / 2.0) as i32,
        y: ((-v.y + 1.0) * height as f32 / 2.0) as i32,
        z: v.z,
    }
}

/// Z component of `(v2 - v1) x (v3 - v1)` in NDC. Positive for triangles
/// wound counter-clockwise as seen by the viewer.
#[inline(always)]
pub fn signed_area_z(v1: Point3D, v2: Point3D, v3: Point3D) -> f32 {
    (v2.x - v1.x) * (v3.y - v1.y) - (v2.y - v1.y) * (v3.x - v1.x)
}

pub fn is_backfacing(v1: Point3D, v2: Point3D, v3: Point3D) -> bool {
    signed_area_z(v1, v2, v3) <= 0.0
}

/// Triangle in pixel space, ready for barycentric coverage tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenTriangle {
    pub a: ScreenVertex,
    pub b: ScreenVertex,
    pub c: ScreenVertex,
    // i128 keeps edge products exact for any i32 coordinates, including
    // vertices saturated by the screen mapping.
    denom: i128,
}

impl ScreenTriangle {
    /// `None` for degenerate triangles (zero twice-signed area).
    pub fn new(a: ScreenVertex, b: ScreenVertex, c: ScreenVertex) -> Option<Self> {
        let (x1, y1) = (a.x as i128, a.y as i128);
        let (x2, y2) = (b.x as i128, b.y as i128);
        let (x3, y3) = (c.x as i128, c.y as i128);
        let denom = (y2 - y3) * (x1 - x3) + (x3 - x2) * (y1 - y3);
        if denom == 0 {
            return None;
        }
        Some(Self { a, b, c, denom })
    }

    pub fn bounds(&self, width: u32, height: u32) -> Option<Rect> {
        Rect::clamped_bounds([self.a.x, self.b.x, self.c.x], [self.a.y, self.b.y, self.c.y], width, height)
    }

    /// Barycentric weights `(w1, w2, w3)` of pixel `(x, y)`, or `None` when the
    /// pixel is outside. Edges count as inside, so a pixel on an edge shared
    /// by two triangles is covered by both.
    #[inline(always)]
    pub fn weights(&self, x: i32, y: i32) -> Option<Point3D> {
        let (x, y) = (x as i128, y as i128);
        let (x1, y1) = (self.a.x as i128, self.a.y as i128);
        let (x2, y2) = (self.b.x as i128, self.b.y as i128);
        let (x3, y3) = (self.c.x as i128, self.c.y as i128);

        let n1 = (y2 - y3) * (x - x3) + (x3 - x2) * (y - y3);
        let n2 = (y3 - y1) * (x - x3) + (x1 - x3) * (y - y3);
        let n3 = self.denom - n1 - n2;

        // Fail fast on any edge; signs are relative to the winding.
        let sign = self.denom.signum();
        if n1 * sign < 0 || n2 * sign < 0 || n3 * sign < 0 {
            return None;
        }

        let inv_denom = 1.0 / self.denom as f32;
        Some(Point3D::direction(n1 as f32 * inv_denom, n2 as f32 * inv_denom, n3 as f32 * inv_denom))
    }

    /// Screen-space depth, interpolated linearly (not perspective-correct).
    #[inline(always)]
    pub fn depth(&self, weights: Point3D) -> f32 {
        dot3(Point3D::direction(self.a.z, self.b.z, self.c.z), weights)
    }
}
