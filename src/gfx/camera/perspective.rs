use cgmath::{Deg, Matrix4, Point3, Rad, Vector3};

use super::camera_utils::{matrix_columns, Camera, CameraUniform, OPENGL_TO_WGPU_MATRIX};

/// Perspective camera described by a vertical field of view.
///
/// Projection parameters are only picked up by
/// [`update_projection_matrix`](Self::update_projection_matrix); position and
/// target are read every time the view matrix is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view, in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Magnification; values above 1 narrow the frustum.
    pub zoom: f32,
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    projection: Matrix4<f32>,
}

impl Camera for PerspectiveCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            zoom: 1.0,
            position: Vector3::new(0.0, 0.0, 0.0),
            target: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            projection: OPENGL_TO_WGPU_MATRIX,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn fov_radians(&self) -> Rad<f32> {
        Deg(self.fov).into()
    }

    /// Recomputes the projection from fov, aspect, near, far and zoom.
    pub fn update_projection_matrix(&mut self) {
        let top = self.near * (self.fov_radians().0 * 0.5).tan() / self.zoom;
        let height = 2.0 * top;
        let width = self.aspect * height;
        let left = -0.5 * width;

        self.projection = OPENGL_TO_WGPU_MATRIX
            * cgmath::frustum(left, left + width, top - height, top, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::new(self.position.x, self.position.y, self.position.z),
            Point3::new(self.target.x, self.target.y, self.target.z),
            self.up,
        )
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: [self.position.x, self.position.y, self.position.z, 1.0],
            view_proj: matrix_columns(self.build_view_projection_matrix()),
        }
    }
}
