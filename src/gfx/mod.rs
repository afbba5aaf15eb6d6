//! # Graphics Module
//!
//! Everything the model renderer draws with.
//!
//! - **Camera** ([`camera`]) - Perspective camera, damped orbit controls and
//!   the field-of-view framing math
//! - **Scene** ([`scene`]) - Models, meshes, bounding boxes and the grid,
//!   light and fog helpers
//! - **Resources** ([`resources`]) - Colors, materials, depth texture and the
//!   global uniform block
//! - **Rendering** ([`rendering`]) - The wgpu [`RenderEngine`] and its pipelines

pub mod camera;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{OrbitControls, PerspectiveCamera};
pub use rendering::render_engine::RenderEngine;
