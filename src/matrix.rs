use std::ops::Mul;

use crate::point3d::Point3D;

/// Row-major 4x4 transform. Points are column vectors: `m * p`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4x4 {
    pub m: [[f32; 4]; 4],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4x4 {
    pub const IDENTITY: Matrix4x4 = Matrix4x4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    /// Matrix-vector product. The perspective divide happens only when the
    /// resulting w is neither 0 (direction) nor 1 (affine result).
    pub fn transform(&self, p: Point3D) -> Point3D {
        let m = &self.m;
        let mut x = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3] * p.w;
        let mut y = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3] * p.w;
        let mut z = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3] * p.w;
        let mut w = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3] * p.w;

        if w != 0.0 && w != 1.0 {
            x /= w;
            y /= w;
            z /= w;
            w = 1.0;
        }
        Point3D { x, y, z, w }
    }
}

impl Mul for Matrix4x4 {
    type Output = Matrix4x4;
    fn mul(self, other: Matrix4x4) -> Matrix4x4 {
        let mut result = [[0.0f32; 4]; 4];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Matrix4x4 { m: result }
    }
}
