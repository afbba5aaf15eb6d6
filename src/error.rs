//! Crate-level error types.
//!
//! Configuration problems fail fast when a [`ModelRenderer`](crate::renderer::ModelRenderer)
//! is constructed, container resolution fails in `init`, and load failures
//! surface asynchronously through [`PendingLoad`](crate::loader::PendingLoad).

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading or validating renderer options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No container selector is specified")]
    MissingContainer,

    #[error("failed to parse renderer options: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read options file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors produced by the renderer façade and its render targets.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The container selector did not resolve to anything the platform knows.
    #[error("container `{0}` does not match any element")]
    ContainerNotFound(String),

    #[error("renderer has not been initialized")]
    NotInitialized,

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Errors produced while loading a model.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No model url is specified")]
    MissingUrl,

    #[error("failed to read model `{url}`: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model `{url}`: {source}")]
    Parse {
        url: String,
        #[source]
        source: tobj::LoadError,
    },

    /// Failure reported by a loader, forwarded as-is.
    #[error("{0}")]
    Loader(String),

    /// The loader dropped both completion callbacks without calling either.
    #[error("model loader finished without reporting a result")]
    Abandoned,
}
