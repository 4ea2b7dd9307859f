use scenebox_render::{RenderView, RendererKind, RendererSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::FailurePolicy;

/// Errors from loading or validating a sandbox configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format for {} (expected .yaml, .yml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Sandbox configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Mode active at startup.
    pub initial_mode: RendererKind,
    /// Initialize a renderer when it becomes active.
    pub auto_initialize: bool,
    /// Shut the outgoing renderer down on every mode switch.
    pub shutdown_on_switch: bool,
    /// Meshes in the generated demo scene.
    pub scene_meshes: usize,
    pub view: RenderView,
    pub policy: FailurePolicy,
    pub renderers: RendererSettings,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            initial_mode: RendererKind::Forward,
            auto_initialize: true,
            shutdown_on_switch: false,
            scene_meshes: 16,
            view: RenderView::default(),
            policy: FailurePolicy::default(),
            renderers: RendererSettings::default(),
        }
    }
}

impl SandboxConfig {
    /// Load from a YAML or JSON file, picked by extension, and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config = match ext.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::debug!(path = %path.display(), "loaded sandbox config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty YAML document deserializes to null rather than an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate().map_err(ConfigError::Invalid)?;
        if self.policy.fallback_order.as_slice() == [self.initial_mode] {
            return Err(ConfigError::Invalid(format!(
                "fallback_order only contains the initial mode {}",
                self.initial_mode
            )));
        }
        Ok(())
    }
}
