//! Per-frame uniforms shared by every draw: camera, fog and hemisphere light.

use cgmath::{InnerSpace, Vector3};

use crate::{
    gfx::{camera::PerspectiveCamera, scene::Scene},
    wgpu_utils::uniform_buffer::UniformBuffer,
};

/// Global uniform block. MUST match `Globals` in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// Fog color in rgb, density in w. Zero density disables fog.
    pub fog: [f32; 4],
    /// Sky color in rgb, light intensity in w.
    pub sky_color: [f32; 4],
    pub ground_color: [f32; 4],
    /// Direction towards the sky, normalized.
    pub light_direction: [f32; 4],
}

impl GlobalUniform {
    pub fn new(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let camera_uniform = camera.uniform();

        let fog = scene
            .fog
            .map(|fog| fog.color.to_array4(fog.density))
            .unwrap_or([0.0; 4]);

        let (sky_color, ground_color, light_direction) = match scene.hemisphere_light() {
            Some(light) => {
                let direction = if light.position.magnitude2() > 0.0 {
                    light.position.normalize()
                } else {
                    Vector3::unit_y()
                };
                (
                    light.sky.to_array4(light.intensity),
                    light.ground.to_array4(0.0),
                    [direction.x, direction.y, direction.z, 0.0],
                )
            }
            None => ([0.0; 4], [0.0; 4], [0.0, 1.0, 0.0, 0.0]),
        };

        Self {
            view_proj: camera_uniform.view_proj,
            camera_position: camera_uniform.view_position,
            fog,
            sky_color,
            ground_color,
            light_direction,
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Bind group layout and bind group for the global uniform (group 0).
pub struct GlobalBindings {
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self { layout, bind_group }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
