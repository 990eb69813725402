//! Builders for the usual model/view/projection matrices.
//!
//! All angles are radians. Rotations are counter-clockwise when looking down
//! the rotation axis towards the origin (right-handed).

use crate::matrix::Matrix4x4;
use crate::point3d::{Point3D, normalize};

/// Coordinate axis. Reflections negate its component; surfaces of revolution
/// sweep around it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

pub fn translation(tx: f32, ty: f32, tz: f32) -> Matrix4x4 {
    let mut mat = Matrix4x4::IDENTITY;
    mat.m[0][3] = tx;
    mat.m[1][3] = ty;
    mat.m[2][3] = tz;
    mat
}

pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4x4 {
    let mut mat = Matrix4x4::IDENTITY;
    mat.m[0][0] = sx;
    mat.m[1][1] = sy;
    mat.m[2][2] = sz;
    mat
}

pub fn rotation_x(angle: f32) -> Matrix4x4 {
    let (sin, cos) = angle.sin_cos();
    let mut mat = Matrix4x4::IDENTITY;
    mat.m[1][1] = cos;
    mat.m[1][2] = -sin;
    mat.m[2][1] = sin;
    mat.m[2][2] = cos;
    mat
}

pub fn rotation_y(angle: f32) -> Matrix4x4 {
    let (sin, cos) = angle.sin_cos();
    let mut mat = Matrix4x4::IDENTITY;
    mat.m[0][0] = cos;
    mat.m[0][2] = sin;
    mat.m[2][0] = -sin;
    mat.m[2][2] = cos;
    mat
}

pub fn rotation_z(angle: f32) -> Matrix4x4 {
    let (sin, cos) = angle.sin_cos();
    let mut mat = Matrix4x4::IDENTITY;
    mat.m[0][0] = cos;
    mat.m[0][1] = -sin;
    mat.m[1][0] = sin;
    mat.m[1][1] = cos;
    mat
}

/// Rotation about the line through `p1` and `p2` (Rodrigues' formula).
/// Returns the identity when the two points coincide.
pub fn rotation_about_axis(p1: Point3D, p2: Point3D, angle: f32) -> Matrix4x4 {
    let axis = normalize(p2 - p1);
    if axis == Point3D::ZERO {
        return Matrix4x4::IDENTITY;
    }

    let (u, v, w) = (axis.x, axis.y, axis.z);
    let (sin, cos) = angle.sin_cos();
    let t = 1.0 - cos;

    let rotation = Matrix4x4::from_rows([
        [u * u + (1.0 - u * u) * cos, u * v * t - w * sin, u * w * t + v * sin, 0.0],
        [u * v * t + w * sin, v * v + (1.0 - v * v) * cos, v * w * t - u * sin, 0.0],
        [u * w * t - v * sin, v * w * t + u * sin, w * w + (1.0 - w * w) * cos, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    translation(p1.x, p1.y, p1.z) * rotation * translation(-p1.x, -p1.y, -p1.z)
}

/// Mirror that negates the given coordinate.
pub fn reflection(axis: Axis) -> Matrix4x4 {
    let mut mat = Matrix4x4::IDENTITY;
    match axis {
        Axis::X => mat.m[0][0] = -1.0,
        Axis::Y => mat.m[1][1] = -1.0,
        Axis::Z => mat.m[2][2] = -1.0,
    }
    mat
}

/// OpenGL-style perspective projection looking down -Z.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4x4 {
    let f = 1.0 / (fov_y * 0.5).tan();
    let mut mat = Matrix4x4::IDENTITY;
    mat.m[0][0] = f / aspect;
    mat.m[1][1] = f;
    mat.m[2][2] = (far + near) / (near - far);
    mat.m[2][3] = (2.0 * far * near) / (near - far);
    mat.m[3][2] = -1.0;
    mat.m[3][3] = 0.0;
    mat
}

/// Orthographic (axonometric) projection of the given view box.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4x4 {
    let mut mat = Matrix4x4::IDENTITY;
    mat.m[0][0] = 2.0 / (right - left);
    mat.m[1][1] = 2.0 / (top - bottom);
    mat.m[2][2] = -2.0 / (far - near);
    mat.m[0][3] = -(right + left) / (right - left);
    mat.m[1][3] = -(top + bottom) / (top - bottom);
    mat.m[2][3] = -(far + near) / (far - near);
    mat
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: Point3D, b: Point3D) {
        assert!(
            (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn quarter_turns_follow_right_hand_rule() {
        assert_close(rotation_z(FRAC_PI_2).transform(Point3D::new(1.0, 0.0, 0.0)), Point3D::new(0.0, 1.0, 0.0));
        assert_close(rotation_x(FRAC_PI_2).transform(Point3D::new(0.0, 1.0, 0.0)), Point3D::new(0.0, 0.0, 1.0));
        assert_close(rotation_y(FRAC_PI_2).transform(Point3D::new(0.0, 0.0, 1.0)), Point3D::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn axis_rotation_matches_rotation_z_through_origin() {
        let about = rotation_about_axis(Point3D::ORIGIN, Point3D::new(0.0, 0.0, 2.0), 0.7);
        let p = Point3D::new(0.3, -1.2, 0.5);
        assert_close(about.transform(p), rotation_z(0.7).transform(p));
    }

    #[test]
    fn axis_rotation_keeps_points_on_axis_fixed() {
        let p1 = Point3D::new(1.0, 1.0, 0.0);
        let p2 = Point3D::new(1.0, 1.0, 1.0);
        let rot = rotation_about_axis(p1, p2, 1.3);
        assert_close(rot.transform(Point3D::new(1.0, 1.0, 5.0)), Point3D::new(1.0, 1.0, 5.0));
        assert_close(rot.transform(Point3D::new(2.0, 1.0, 0.0)), Point3D::new(1.0 + 1.3f32.cos(), 1.0 + 1.3f32.sin(), 0.0));
    }

    #[test]
    fn zero_length_axis_is_identity() {
        let p = Point3D::new(2.0, 3.0, 4.0);
        assert_eq!(rotation_about_axis(p, p, 1.0), Matrix4x4::IDENTITY);
    }

    #[test]
    fn reflection_negates_one_component() {
        let p = Point3D::new(1.0, 2.0, 3.0);
        assert_eq!(reflection(Axis::Y).transform(p), Point3D::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn perspective_maps_near_and_far_planes_to_ndc_bounds() {
        let proj = perspective(FRAC_PI_2, 1.0, 1.0, 10.0);
        assert!((proj.transform(Point3D::new(0.0, 0.0, -1.0)).z + 1.0).abs() < 1e-5);
        assert!((proj.transform(Point3D::new(0.0, 0.0, -10.0)).z - 1.0).abs() < 1e-5);
        // 90 degree fov: a point at 45 degrees lands on the right edge.
        assert!((proj.transform(Point3D::new(2.0, 0.0, -2.0)).x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn orthographic_maps_box_to_unit_cube() {
        let proj = orthographic(-2.0, 2.0, -1.0, 1.0, 0.0, 10.0);
        assert_close(proj.transform(Point3D::new(2.0, 1.0, 0.0)), Point3D::new(1.0, 1.0, -1.0));
        assert_close(proj.transform(Point3D::new(-2.0, -1.0, -10.0)), Point3D::new(-1.0, -1.0, 1.0));
    }
}
