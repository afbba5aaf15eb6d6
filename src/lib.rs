// src/lib.rs
//! Model Renderer
//!
//! Loads a 3D model, frames it with a damped orbit camera and lights it with a
//! hemisphere light, built on wgpu and winit.

pub mod app;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod gfx;
pub mod loader;
pub mod platform;
pub mod renderer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::{RendererConfig, RendererOptions};
pub use error::{ConfigError, LoadError, RendererError};
pub use frame_loop::{FrameLoop, FrameLoopHandle};
pub use loader::{load_with, ModelLoader, ObjLoader, PendingLoad};
pub use platform::{ContainerSize, Platform, RenderTarget, SurfaceSettings, WinitPlatform};
pub use renderer::{CameraDefaults, HostEvent, ModelRenderer, MouseState};
