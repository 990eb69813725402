use crate::matrix::Matrix4x4;
use crate::point3d::{Point3D, cross3, dot3, normalize};

/// Vertical orbit angle limit, short of the poles where the look-at basis
/// would flip.
pub const MAX_VERTICAL_ANGLE: f32 = 89.0 * std::f32::consts::PI / 180.0;
pub const MIN_RADIUS: f32 = 0.1;

/// Camera orbiting `target` on a sphere of `radius`. Angles are radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub position: Point3D,
    pub target: Point3D,
    pub up: Point3D,
    pub radius: f32,
    pub angle_h: f32,
    pub angle_v: f32,
}

impl OrbitCamera {
    /// Places the camera at `position`, deriving radius and orbit angles from
    /// its offset to `target`.
    pub fn new(position: Point3D, target: Point3D) -> Self {
        let offset = position - target;
        let radius = offset.length();
        let (angle_h, angle_v) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).asin())
        } else {
            (0.0, 0.0)
        };
        Self {
            position,
            target,
            up: Point3D::direction(0.0, 1.0, 0.0),
            radius,
            angle_h,
            angle_v: angle_v.clamp(-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE),
        }
    }

    pub fn rotate_around_target(&mut self, delta_h: f32, delta_v: f32) {
        self.angle_h += delta_h;
        self.angle_v = (self.angle_v + delta_v).clamp(-MAX_VERTICAL_ANGLE, MAX_VERTICAL_ANGLE);
        self.update_position();
    }

    /// Moves towards (negative) or away from (positive) the target.
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius + delta).max(MIN_RADIUS);
        self.update_position();
    }

    fn update_position(&mut self) {
        let (sin_h, cos_h) = self.angle_h.sin_cos();
        let (sin_v, cos_v) = self.angle_v.sin_cos();
        let offset = Point3D::direction(cos_v * sin_h, sin_v, cos_v * cos_h);
        self.position = self.target + offset * self.radius;
    }

    /// Look-at matrix. Undefined when `up` is parallel to the view direction.
    pub fn view_matrix(&self) -> Matrix4x4 {
        let forward = normalize(self.target - self.position);
        let right = normalize(cross3(forward, self.up));
        let up = cross3(right, forward);
        let eye = self.position;

        Matrix4x4::from_rows([
            [right.x, right.y, right.z, -dot3(right, eye)],
            [up.x, up.y, up.z, -dot3(up, eye)],
            [-forward.x, -forward.y, -forward.z, dot3(forward, eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: Point3D, b: Point3D) {
        assert!(
            (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4 && (a.z - b.z).abs() < 1e-4,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn new_derives_orbit_from_position() {
        let cam = OrbitCamera::new(Point3D::new(0.0, 0.0, 5.0), Point3D::ORIGIN);
        assert_eq!(cam.radius, 5.0);
        assert_eq!(cam.angle_h, 0.0);
        assert_eq!(cam.angle_v, 0.0);
    }

    #[test]
    fn rotation_moves_camera_on_sphere() {
        let mut cam = OrbitCamera::new(Point3D::new(1.0, 0.0, 3.0), Point3D::new(1.0, 0.0, 0.0));
        let radius = cam.radius;
        cam.rotate_around_target(FRAC_PI_2, 0.0);
        assert_close(cam.position, Point3D::new(1.0 + radius, 0.0, 0.0));
        assert!(((cam.position - cam.target).length() - radius).abs() < 1e-4);
    }

    #[test]
    fn vertical_angle_is_clamped() {
        let mut cam = OrbitCamera::new(Point3D::new(0.0, 0.0, 3.0), Point3D::ORIGIN);
        cam.rotate_around_target(0.0, 10.0);
        assert_eq!(cam.angle_v, MAX_VERTICAL_ANGLE);
        cam.rotate_around_target(0.0, -20.0);
        assert_eq!(cam.angle_v, -MAX_VERTICAL_ANGLE);
    }

    #[test]
    fn zoom_never_reaches_target() {
        let mut cam = OrbitCamera::new(Point3D::new(0.0, 0.0, 3.0), Point3D::ORIGIN);
        cam.zoom(-10.0);
        assert_eq!(cam.radius, MIN_RADIUS);
    }

    #[test]
    fn view_matrix_puts_target_in_front_of_camera() {
        let cam = OrbitCamera::new(Point3D::new(0.0, 0.0, 5.0), Point3D::ORIGIN);
        let view = cam.view_matrix();
        assert_close(view.transform(Point3D::ORIGIN), Point3D::new(0.0, 0.0, -5.0));
        assert_close(view.transform(cam.position), Point3D::new(0.0, 0.0, 0.0));
        assert_close(view.transform(Point3D::new(1.0, 2.0, 0.0)), Point3D::new(1.0, 2.0, -5.0));
    }

    #[test]
    fn view_matrix_after_orbit_looks_at_target() {
        let mut cam = OrbitCamera::new(Point3D::new(0.0, 0.0, 4.0), Point3D::new(1.0, 1.0, 1.0));
        cam.rotate_around_target(0.8, 0.4);
        let target_in_view = cam.view_matrix().transform(cam.target);
        assert_close(target_in_view, Point3D::new(0.0, 0.0, -cam.radius));
    }
}
