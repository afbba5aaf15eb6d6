//! WGPU-based rendering engine for the model renderer
//!
//! Owns the surface, device and depth buffer, and draws a [`Scene`] with the
//! mesh and grid pipelines. The drawing buffer is sized in physical pixels:
//! the logical container size times the pixel ratio it was mounted with.

use std::sync::Arc;

use crate::{
    error::RendererError,
    gfx::{
        camera::PerspectiveCamera,
        resources::{DepthTexture, GlobalBindings, GlobalUBO, GlobalUniform},
        scene::Scene,
    },
    platform::{ContainerSize, RenderTarget, SurfaceSettings},
};

use super::{
    pipelines::Pipelines,
    scene_buffers::{object_bind_group_layout, SceneBuffers},
};

/// Converts a logical size to drawing-buffer pixels, never below one.
pub fn physical_size(size: ContainerSize, pixel_ratio: f64) -> (u32, u32) {
    let scale = |v: u32| ((v as f64 * pixel_ratio).round() as u32).max(1);
    (scale(size.width), scale(size.height))
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    settings: SurfaceSettings,
    logical_size: ContainerSize,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
    pipelines: Pipelines,
    scene_buffers: Option<SceneBuffers>,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`.
    ///
    /// # Errors
    /// Returns [`RendererError::Gpu`] if no surface, adapter or device can be
    /// created for the window.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: ContainerSize,
        settings: SurfaceSettings,
    ) -> Result<RenderEngine, RendererError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| RendererError::Gpu(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RendererError::Gpu(format!("failed to request adapter: {e}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RendererError::Gpu(format!("failed to request device: {e}")))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| RendererError::Gpu("surface reports no formats".to_string()))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let (width, height) = physical_size(size, settings.pixel_ratio);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, config.width, config.height);

        let global_ubo = GlobalUBO::new(&device, "Global Uniforms");
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let object_layout = object_bind_group_layout(&device);
        let pipelines = Pipelines::new(&device, format, global_bindings.layout(), &object_layout);

        log::info!(
            "Render engine ready: {}x{} px ({:?}, pixel ratio {})",
            width,
            height,
            format,
            settings.pixel_ratio
        );

        Ok(RenderEngine {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            depth_texture,
            settings,
            logical_size: size,
            global_ubo,
            global_bindings,
            object_layout,
            pipelines,
            scene_buffers: None,
        })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(&self.device, self.config.width, self.config.height);
    }

    /// Returns current surface dimensions in physical pixels
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}

impl RenderTarget for RenderEngine {
    fn set_size(&mut self, width: u32, height: u32) {
        self.logical_size = ContainerSize::new(width, height);
        let (width, height) = physical_size(self.logical_size, self.settings.pixel_ratio);
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    fn size(&self) -> ContainerSize {
        self.logical_size
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RendererError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if !self
            .scene_buffers
            .as_ref()
            .is_some_and(|buffers| buffers.is_for(scene))
        {
            let buffers = SceneBuffers::build(&self.device, &self.object_layout, scene);
            for mesh in buffers.meshes() {
                self.pipelines.prepare(&self.device, mesh.key);
            }
            self.scene_buffers = Some(buffers);
        }

        self.global_ubo
            .write(&self.queue, &GlobalUniform::new(scene, camera));

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let clear = self.settings.clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(buffers) = self.scene_buffers.as_ref() {
                for mesh in buffers.meshes() {
                    let Some(pipeline) = self.pipelines.mesh(mesh.key) else {
                        log::warn!("No mesh pipeline for {:?}", mesh.key);
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    mesh.draw(&mut render_pass);
                }

                render_pass.set_pipeline(self.pipelines.lines());
                for lines in buffers.lines() {
                    lines.draw(&mut render_pass);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }
}
