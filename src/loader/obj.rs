//! Wavefront OBJ loading via `tobj`.

use std::{
    io::BufReader,
    path::{Path, PathBuf},
    thread,
};

use crate::{
    error::LoadError,
    gfx::{
        resources::material::{Color, MeshMaterial},
        scene::{Mesh, ModelObject},
    },
};

use super::{LoadProgress, ModelLoader, OnError, OnLoad, OnProgress};

/// Loads `.obj` files (and their `.mtl` libraries) on a worker thread.
///
/// Every object or group in the file becomes one direct child mesh of the
/// returned [`ModelObject`].
#[derive(Debug, Clone, Default)]
pub struct ObjLoader;

impl ObjLoader {
    pub fn new() -> Self {
        Self
    }

    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        }
    }

    /// Maps a url to a filesystem path; only local paths and `file://` urls are supported.
    pub fn resolve_path(url: &str) -> PathBuf {
        PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
    }

    /// Loads and parses a model synchronously.
    pub fn load_blocking(
        url: &str,
        on_progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<ModelObject, LoadError> {
        let path = Self::resolve_path(url);
        std::fs::metadata(&path).map_err(|source| LoadError::Io {
            url: url.to_string(),
            source,
        })?;

        let (models, materials) =
            tobj::load_obj(&path, &Self::load_options()).map_err(|source| LoadError::Parse {
                url: url.to_string(),
                source,
            })?;

        let materials = materials.unwrap_or_else(|err| {
            log::warn!("No usable MTL for {url} ({err}), using default materials");
            Vec::new()
        });

        Ok(build_object(&object_name(&path), models, &materials, on_progress))
    }

    /// Parses OBJ text held in memory. Material libraries are not resolved.
    pub fn parse_str(name: &str, source: &str) -> Result<ModelObject, LoadError> {
        let mut reader = BufReader::new(source.as_bytes());
        let (models, _) = tobj::load_obj_buf(&mut reader, &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|source| LoadError::Parse {
            url: name.to_string(),
            source,
        })?;

        Ok(build_object(name, models, &[], &mut |_| {}))
    }
}

impl ModelLoader for ObjLoader {
    fn load(&self, url: &str, on_load: OnLoad, on_progress: Option<OnProgress>, on_error: OnError) {
        let url = url.to_string();
        let spawned = thread::Builder::new()
            .name("obj-loader".to_string())
            .spawn(move || {
                let mut on_progress = on_progress;
                let mut report = |progress: LoadProgress| {
                    if let Some(callback) = on_progress.as_mut() {
                        callback(progress);
                    }
                };
                match Self::load_blocking(&url, &mut report) {
                    Ok(object) => on_load(object),
                    Err(err) => on_error(err),
                }
            });

        if let Err(err) = spawned {
            log::error!("Failed to spawn OBJ loader thread: {err}");
        }
    }
}

fn object_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string()
}

fn build_object(
    name: &str,
    models: Vec<tobj::Model>,
    materials: &[tobj::Material],
    on_progress: &mut dyn FnMut(LoadProgress),
) -> ModelObject {
    let total = models.len();
    let mut children = Vec::with_capacity(total);

    for (i, model) in models.into_iter().enumerate() {
        let mesh_name = if model.name.is_empty() {
            format!("mesh_{i}")
        } else {
            model.name
        };
        let tobj_mesh = model.mesh;

        let mut mesh = Mesh::new(
            mesh_name,
            &tobj_mesh.positions,
            &tobj_mesh.normals,
            tobj_mesh.indices,
        );

        if let Some(mtl) = tobj_mesh.material_id.and_then(|id| materials.get(id)) {
            mesh.material = MeshMaterial::Imported {
                name: mtl.name.clone(),
                diffuse: Color::from(mtl.diffuse.unwrap_or([0.8, 0.8, 0.8])),
            };
        }

        log::debug!(
            "Parsed mesh '{}': {} vertices, {} triangles",
            mesh.name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        children.push(mesh);

        on_progress(LoadProgress {
            loaded: i + 1,
            total,
        });
    }

    ModelObject::new(name, children)
}
