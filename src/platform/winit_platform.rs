use std::{collections::HashMap, sync::Arc};

use winit::window::Window;

use crate::{error::RendererError, gfx::rendering::RenderEngine};

use super::{ContainerSize, Platform, SurfaceSettings};

/// Platform backed by winit windows registered under selector names.
///
/// The first registered window is the viewport; mouse offsets are taken
/// relative to its center.
#[derive(Default)]
pub struct WinitPlatform {
    windows: HashMap<String, Arc<Window>>,
    primary: Option<String>,
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, selector: impl Into<String>, window: Arc<Window>) {
        let selector = selector.into();
        log::debug!("Registered container '{}' ({:?})", selector, window.id());
        if self.primary.is_none() {
            self.primary = Some(selector.clone());
        }
        self.windows.insert(selector, window);
    }

    fn logical_size(window: &Window) -> ContainerSize {
        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        ContainerSize::new(size.width.round() as u32, size.height.round() as u32)
    }
}

impl Platform for WinitPlatform {
    type Target = RenderEngine;

    fn viewport_size(&self) -> (f64, f64) {
        self.primary
            .as_deref()
            .and_then(|selector| self.windows.get(selector))
            .map(|window| {
                let size = Self::logical_size(window);
                (size.width as f64, size.height as f64)
            })
            .unwrap_or((0.0, 0.0))
    }

    fn device_pixel_ratio(&self, selector: &str) -> f64 {
        self.windows
            .get(selector)
            .map(|window| window.scale_factor())
            .unwrap_or(1.0)
    }

    fn container_size(&self, selector: &str) -> Option<ContainerSize> {
        self.windows.get(selector).map(|window| Self::logical_size(window))
    }

    fn mount(&mut self, selector: &str, settings: &SurfaceSettings) -> Result<RenderEngine, RendererError> {
        let window = self
            .windows
            .get(selector)
            .cloned()
            .ok_or_else(|| RendererError::ContainerNotFound(selector.to_string()))?;
        let size = Self::logical_size(&window);
        let engine = pollster::block_on(RenderEngine::new(window, size, *settings))?;
        log::info!(
            "Mounted renderer into '{}' ({:?} px, {:?})",
            selector,
            engine.surface_size(),
            engine.surface_format()
        );
        Ok(engine)
    }
}
