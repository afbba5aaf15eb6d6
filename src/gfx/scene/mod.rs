//! # Scene Management Module
//!
//! Scene graph pieces for the model renderer: loaded models and their meshes,
//! bounding boxes used for framing, and the helpers (grid, hemisphere light,
//! fog) that are placed around a displayed model.
//!
//! ## Key Components
//!
//! - [`Scene`] - Ordered list of nodes plus fog, identified by a unique id
//! - [`ModelObject`] - A loaded model: direct child [`Mesh`]es and a position
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`GridHelper`], [`HemisphereLight`], [`FogExp2`] - Display helpers
//! - [`Vertex3D`] / [`LineVertex`] - GPU vertex formats

pub mod bounds;
pub mod helpers;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use bounds::Aabb;
pub use helpers::{FogExp2, GridHelper, HemisphereLight};
pub use object::{Mesh, ModelObject};
pub use scene::{Scene, SceneNode, SceneStatistics};
pub use vertex::{LineVertex, Vertex3D};
