use cgmath::Matrix4;

/// Remaps OpenGL clip depth (-1..1) to the 0..1 range wgpu expects.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub trait Camera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

/// Camera part of the global uniform block.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// Eye position; `w` is 1 and pads the field to 16 bytes.
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

/// Column-major array layout of a matrix, as WGSL `mat4x4<f32>` reads it.
pub fn matrix_columns(matrix: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix.into()
}
