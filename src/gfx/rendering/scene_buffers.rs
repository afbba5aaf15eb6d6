//! GPU copies of the scene's meshes and grid lines.

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::gfx::{
    camera::camera_utils::matrix_columns,
    resources::material::{LambertMaterial, Shading},
    scene::Scene,
};

use super::pipelines::PipelineKey;

/// Per-draw uniform block. MUST match `ObjectUniform` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    /// x: flat shading, y: fog enabled.
    pub params: [f32; 4],
}

impl ObjectUniform {
    pub fn for_mesh(model: Matrix4<f32>, material: &LambertMaterial) -> Self {
        let flat = if material.shading == Shading::Flat { 1.0 } else { 0.0 };
        let fog = if material.fog { 1.0 } else { 0.0 };
        Self {
            model: matrix_columns(model),
            color: material.color.to_array4(1.0),
            emissive: material.emissive.to_array4(0.0),
            params: [flat, fog, 0.0, 0.0],
        }
    }

    /// Grid lines carry their color per vertex and always take fog.
    pub fn for_lines(model: Matrix4<f32>) -> Self {
        Self {
            model: matrix_columns(model),
            color: [1.0; 4],
            emissive: [0.0; 4],
            params: [0.0, 1.0, 0.0, 0.0],
        }
    }
}

pub fn object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Object Bind Group Layout"),
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
    })
}

struct ObjectBinding {
    _buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ObjectBinding {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, uniform: &ObjectUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Uniform Buffer"),
            contents: bytemuck::bytes_of(uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            _buffer: buffer,
            bind_group,
        }
    }
}

pub struct GpuMesh {
    pub key: PipelineKey,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    binding: ObjectBinding,
}

pub struct GpuLines {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    binding: ObjectBinding,
}

/// Buffers for one [`Scene`], rebuilt whenever a different scene is drawn.
pub struct SceneBuffers {
    scene_id: u64,
    meshes: Vec<GpuMesh>,
    lines: Vec<GpuLines>,
}

impl SceneBuffers {
    pub fn build(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, scene: &Scene) -> Self {
        let mut meshes = Vec::new();
        for model in scene.models() {
            let transform = Matrix4::from_translation(model.position);
            for mesh in model.children.iter().filter(|m| !m.indices.is_empty()) {
                let material = mesh.material.as_lambert();
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Vertex Buffer", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Index Buffer", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                meshes.push(GpuMesh {
                    key: PipelineKey::for_material(&material),
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.indices.len() as u32,
                    binding: ObjectBinding::new(device, layout, &ObjectUniform::for_mesh(transform, &material)),
                });
            }
        }

        let lines = scene
            .grids()
            .map(|grid| {
                let vertices = grid.line_vertices();
                GpuLines {
                    vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Grid Vertex Buffer"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    vertex_count: vertices.len() as u32,
                    binding: ObjectBinding::new(device, layout, &ObjectUniform::for_lines(grid.model_matrix())),
                }
            })
            .collect();

        log::debug!(
            "Uploaded scene {}: {} meshes, {} grids",
            scene.id(),
            meshes.len(),
            scene.grids().count()
        );

        Self {
            scene_id: scene.id(),
            meshes,
            lines,
        }
    }

    pub fn is_for(&self, scene: &Scene) -> bool {
        self.scene_id == scene.id()
    }

    pub fn meshes(&self) -> &[GpuMesh] {
        &self.meshes
    }

    pub fn lines(&self) -> &[GpuLines] {
        &self.lines
    }
}

impl GpuMesh {
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.binding.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

impl GpuLines {
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.binding.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}
