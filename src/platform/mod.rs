//! Host seam for the model renderer.
//!
//! A [`Platform`] knows which render containers exist and how big they are,
//! and can mount a [`RenderTarget`] into one of them. The renderer itself
//! never talks to a window system directly, so the whole state machine runs
//! headless when a test platform is plugged in.

pub mod winit_platform;

pub use winit_platform::WinitPlatform;

use crate::{
    error::RendererError,
    gfx::{camera::PerspectiveCamera, resources::Color, scene::Scene},
};

/// Logical (unscaled) size of a render container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSize {
    pub width: u32,
    pub height: u32,
}

impl ContainerSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A collapsed container counts as one pixel tall.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// How a render target should be set up when it is mounted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSettings {
    pub clear_color: Color,
    pub pixel_ratio: f64,
    pub shadows_enabled: bool,
}

impl SurfaceSettings {
    pub fn new(pixel_ratio: f64) -> Self {
        Self {
            clear_color: Color::WHITE,
            pixel_ratio,
            shadows_enabled: true,
        }
    }
}

/// Something the renderer can draw a scene into.
pub trait RenderTarget {
    /// Resizes the drawing buffer to a logical size; implementations scale by
    /// the pixel ratio they were mounted with.
    fn set_size(&mut self, width: u32, height: u32);

    /// Current logical size of the drawing buffer.
    fn size(&self) -> ContainerSize;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RendererError>;
}

/// Window system access needed by [`crate::ModelRenderer`].
pub trait Platform {
    type Target: RenderTarget;

    /// Logical size of the whole viewport, used for mouse offsets.
    fn viewport_size(&self) -> (f64, f64);

    fn device_pixel_ratio(&self, selector: &str) -> f64;

    /// Size of the container registered under `selector`, or `None` when the
    /// selector matches nothing.
    fn container_size(&self, selector: &str) -> Option<ContainerSize>;

    fn mount(&mut self, selector: &str, settings: &SurfaceSettings) -> Result<Self::Target, RendererError>;
}
