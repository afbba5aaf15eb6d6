// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Materials, the depth texture and the global uniform block.

pub mod global_bindings;
pub mod material;
pub mod depth_texture;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform};
pub use material::{Color, LambertMaterial, MeshMaterial, Shading, Side};
pub use depth_texture::DepthTexture;
