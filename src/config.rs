//! Renderer options and their validated form.
//!
//! [`RendererOptions`] is what callers (or an options file) provide. It is
//! checked exactly once and turned into an immutable [`RendererConfig`]:
//!
//! ```toml
//! container = "#viewer"
//! model = "assets/teapot.obj"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Raw renderer options. Unknown keys are rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererOptions {
    /// Selector of the container the renderer mounts into.
    pub container: Option<String>,
    /// Model loaded when `load_model` is called without a url.
    pub model: Option<String>,
}

impl RendererOptions {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: Some(container.into()),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Validated, immutable renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    container: String,
    model: Option<String>,
}

impl RendererConfig {
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Default model url, if one was configured.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

impl TryFrom<RendererOptions> for RendererConfig {
    type Error = ConfigError;

    fn try_from(options: RendererOptions) -> Result<Self, Self::Error> {
        let container = options
            .container
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingContainer)?;

        let model = options
            .model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        Ok(Self { container, model })
    }
}
