//! Render pipelines for meshes and helper lines.
//!
//! Mesh pipelines differ only in fixed-function state (culling and depth
//! bias). They are created on first use per [`PipelineKey`]; the key of the
//! display material is created up front.

use std::collections::HashMap;

use crate::gfx::{
    resources::{
        depth_texture::DepthTexture,
        material::{LambertMaterial, Side},
    },
    scene::vertex::{LineVertex, Vertex3D},
};

/// Polygon offset as wgpu takes it. The factor is kept as bits so keys hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolygonOffset {
    pub units: i32,
    factor_bits: u32,
}

impl PolygonOffset {
    pub fn new(factor: f32, units: i32) -> Self {
        Self {
            units,
            factor_bits: factor.to_bits(),
        }
    }

    pub fn factor(&self) -> f32 {
        f32::from_bits(self.factor_bits)
    }
}

/// Fixed-function state a mesh material needs from its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub cull_mode: Option<wgpu::Face>,
    pub polygon_offset: Option<PolygonOffset>,
}

impl PipelineKey {
    pub fn for_material(material: &LambertMaterial) -> Self {
        Self {
            cull_mode: match material.side {
                Side::Front => Some(wgpu::Face::Back),
                Side::Back => Some(wgpu::Face::Front),
                Side::Double => None,
            },
            polygon_offset: material.polygon_offset.then(|| {
                PolygonOffset::new(material.polygon_offset_factor, material.polygon_offset_units)
            }),
        }
    }

    /// Depth bias equivalent of the polygon offset: constant = units, slope = factor.
    pub fn depth_bias(&self) -> wgpu::DepthBiasState {
        match self.polygon_offset {
            Some(offset) => wgpu::DepthBiasState {
                constant: offset.units,
                slope_scale: offset.factor(),
                clamp: 0.0,
            },
            None => wgpu::DepthBiasState::default(),
        }
    }
}

pub struct Pipelines {
    layout: wgpu::PipelineLayout,
    mesh_shader: wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    mesh: HashMap<PipelineKey, wgpu::RenderPipeline>,
    lines: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        global_layout: &wgpu::BindGroupLayout,
        object_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[global_layout, object_layout],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
        });

        let lines = create_pipeline(
            device,
            &layout,
            &line_shader,
            format,
            LineVertex::desc(),
            wgpu::PrimitiveTopology::LineList,
            None,
            wgpu::DepthBiasState::default(),
            "Line Pipeline",
        );

        let mut pipelines = Self {
            layout,
            mesh_shader,
            format,
            mesh: HashMap::new(),
            lines,
        };
        pipelines.prepare(device, PipelineKey::for_material(&LambertMaterial::display()));
        pipelines
    }

    /// Creates the mesh pipeline for `key` unless it already exists.
    pub fn prepare(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.mesh.contains_key(&key) {
            return;
        }
        log::debug!("Creating mesh pipeline for {:?}", key);
        let pipeline = create_pipeline(
            device,
            &self.layout,
            &self.mesh_shader,
            self.format,
            Vertex3D::desc(),
            wgpu::PrimitiveTopology::TriangleList,
            key.cull_mode,
            key.depth_bias(),
            "Mesh Pipeline",
        );
        self.mesh.insert(key, pipeline);
    }

    pub fn mesh(&self, key: PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.mesh.get(&key)
    }

    pub fn lines(&self) -> &wgpu::RenderPipeline {
        &self.lines
    }
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    bias: wgpu::DepthBiasState,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
            unclipped_depth: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthTexture::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias,
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_material_is_double_sided_with_offset() {
        let key = PipelineKey::for_material(&LambertMaterial::display());
        assert_eq!(key.cull_mode, None);

        let bias = key.depth_bias();
        assert_eq!(bias.constant, 1);
        assert_eq!(bias.slope_scale, 1.0);
    }

    #[test]
    fn test_default_material_culls_back_faces() {
        let key = PipelineKey::for_material(&LambertMaterial::default());
        assert_eq!(key.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(key.polygon_offset, None);
        assert_eq!(key.depth_bias(), wgpu::DepthBiasState::default());
    }

    #[test]
    fn test_offset_values_are_part_of_the_key() {
        let display = LambertMaterial::display();
        let stronger = LambertMaterial {
            polygon_offset_factor: 2.0,
            polygon_offset_units: 4,
            ..display
        };
        let key = PipelineKey::for_material(&stronger);
        assert_ne!(key, PipelineKey::for_material(&display));

        let bias = key.depth_bias();
        assert_eq!(bias.constant, 4);
        assert_eq!(bias.slope_scale, 2.0);
    }

    #[test]
    fn test_offset_values_are_ignored_when_disabled() {
        let material = LambertMaterial {
            polygon_offset: false,
            ..LambertMaterial::display()
        };
        assert_eq!(PipelineKey::for_material(&material).depth_bias(), wgpu::DepthBiasState::default());
    }
}
