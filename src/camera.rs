//! Projection and view matrix construction.
//!
//! The matrix builders follow the classic OpenGL conventions (right-handed
//! view space, z-clip range [-1, 1]); [`OPENGL_TO_WGPU_MATRIX`] remaps the
//! projection to wgpu's [0, 1] depth range at the point where uniforms are
//! packed, so the raw builders stay testable against the textbook formulas.

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3};

/// Remaps the OpenGL z-clip range [-1, 1] to wgpu's [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Builds a symmetric-frustum perspective projection.
///
/// Assumes `fovy` strictly between 0 and 180 degrees, `aspect > 0` and
/// `0 < znear < zfar`; outside those ranges the result is degenerate. The
/// inputs are not validated.
pub fn perspective(fovy: Deg<f32>, aspect: f32, znear: f32, zfar: f32) -> Matrix4<f32> {
    let f = 1.0 / (Rad::from(fovy).0 / 2.0).tan();

    #[rustfmt::skip]
    let matrix = Matrix4::new(
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, (zfar + znear) / (znear - zfar), -1.0,
        0.0, 0.0, (2.0 * zfar * znear) / (znear - zfar), 0.0,
    );
    matrix
}

/// Builds a right-handed view matrix looking from `eye` towards `center`.
///
/// The caller guarantees `center != eye` (the forward vector must be
/// normalizable) and that `up` is not parallel to the forward direction;
/// either degenerate input produces NaN entries.
pub fn look_at(eye: Point3<f32>, center: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let forward = (center - eye).normalize();
    let right = forward.cross(up).normalize();
    let true_up = right.cross(forward);
    let position = eye.to_vec();

    #[rustfmt::skip]
    let matrix = Matrix4::new(
        right.x, true_up.x, -forward.x, 0.0,
        right.y, true_up.y, -forward.y, 0.0,
        right.z, true_up.z, -forward.z, 0.0,
        -right.dot(position), -true_up.dot(position), forward.dot(position), 1.0,
    );
    matrix
}

/// The demo's fixed camera: two units in front of the quad, looking at the
/// origin.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<E: Into<Point3<f32>>, T: Into<Point3<f32>>>(eye: E, target: T) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        look_at(self.eye, self.target, self.up)
    }
}

/// Viewport state and the projection derived from it.
///
/// Owned by the render window; the resize callback updates it and the loop
/// re-reads it every frame.
#[derive(Debug, Clone)]
pub struct Projection {
    width: u32,
    height: u32,
    fovy: Deg<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: Deg<f32>, znear: f32, zfar: f32) -> Self {
        let mut projection = Self {
            width: 0,
            height: 0,
            fovy,
            znear,
            zfar,
        };
        projection.resize(width, height);
        projection
    }

    /// Updates the cached viewport size. A zero height is substituted with 1
    /// so the aspect ratio never divides by zero.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height.max(1);
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect(), self.znear, self.zfar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Transform, point3, vec3};

    const EPS: f32 = 1e-5;

    #[test]
    fn perspective_diagonal_terms_follow_fov_and_aspect() {
        for (fovy, aspect) in [(45.0, 4.0 / 3.0), (60.0, 16.0 / 9.0), (90.0, 1.0)] {
            let m = perspective(Deg(fovy), aspect, 0.1, 100.0);
            let f = 1.0 / (fovy.to_radians() / 2.0).tan();
            assert!((m[1][1] - f).abs() < EPS);
            assert!((m[0][0] - f / aspect).abs() < EPS);
        }
    }

    #[test]
    fn perspective_carries_the_projective_term() {
        let m = perspective(Deg(45.0), 800.0 / 600.0, 0.1, 100.0);
        assert_eq!(m[2][3], -1.0);
        assert_eq!(m[3][3], 0.0);
    }

    #[test]
    fn look_at_maps_eye_to_origin() {
        let m = look_at(point3(0.0, 0.0, -2.0), point3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
        let eye = m.transform_point(point3(0.0, 0.0, -2.0));
        assert!(eye.x.abs() < EPS && eye.y.abs() < EPS && eye.z.abs() < EPS);
    }

    #[test]
    fn look_at_places_center_on_the_forward_axis() {
        let m = look_at(point3(0.0, 0.0, -2.0), point3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
        let center = m.transform_point(point3(0.0, 0.0, 0.0));
        // Camera space looks down -z; the center sits two units ahead.
        assert!(center.x.abs() < EPS && center.y.abs() < EPS);
        assert!((center.z + 2.0).abs() < EPS);
    }

    #[test]
    fn resize_guards_against_zero_height() {
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        projection.resize(640, 0);
        assert_eq!(projection.aspect(), 640.0);
    }

    #[test]
    fn aspect_is_width_over_height() {
        let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        assert!((projection.aspect() - 800.0 / 600.0).abs() < EPS);
    }
}
