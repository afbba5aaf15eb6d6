// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Render pipelines, per-scene GPU buffers, and frame rendering.

pub mod pipelines;
pub mod render_engine;
pub mod scene_buffers;

// Re-export main types
pub use pipelines::{PipelineKey, Pipelines, PolygonOffset};
pub use render_engine::RenderEngine;
pub use scene_buffers::{ObjectUniform, SceneBuffers};
