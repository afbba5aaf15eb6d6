use std::sync::atomic::{AtomicU64, Ordering};

use super::{
    bounds::Aabb,
    helpers::{FogExp2, GridHelper, HemisphereLight},
    object::ModelObject,
};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Anything that can be placed in a [`Scene`].
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    /// Marks the renderer's camera as attached to this scene.
    Camera,
    Model(ModelObject),
    Grid(GridHelper),
    HemisphereLight(HemisphereLight),
}

/// Flat scene graph consumed by the render loop.
///
/// Every scene gets a fresh id, so render targets can tell a replaced scene
/// from the one they already uploaded.
#[derive(Debug)]
pub struct Scene {
    id: u64,
    pub fog: Option<FogExp2>,
    pub nodes: Vec<SceneNode>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            fog: None,
            nodes: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn add(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn has_camera(&self) -> bool {
        self.nodes.iter().any(|n| matches!(n, SceneNode::Camera))
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelObject> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Model(model) => Some(model),
            _ => None,
        })
    }

    pub fn grids(&self) -> impl Iterator<Item = &GridHelper> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Grid(grid) => Some(grid),
            _ => None,
        })
    }

    pub fn hemisphere_light(&self) -> Option<&HemisphereLight> {
        self.nodes.iter().find_map(|n| match n {
            SceneNode::HemisphereLight(light) => Some(light),
            _ => None,
        })
    }

    /// World-space box around all model geometry. Cameras and lights have
    /// no extent; helpers are excluded so they never affect framing.
    pub fn bounding_box(&self) -> Aabb {
        self.models()
            .fold(Aabb::empty(), |acc, model| acc.union(&model.bounding_box()))
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        SceneStatistics {
            model_count: self.models().count(),
            mesh_count: self.models().map(|m| m.children.len()).sum(),
            total_triangles: self.models().map(ModelObject::triangle_count).sum(),
            total_vertices: self.models().map(ModelObject::vertex_count).sum(),
        }
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub model_count: usize,
    pub mesh_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
