//! Centralized viewport options with TOML preset support.
//!
//! Camera, lighting, gesture and loader settings live here. Options
//! serialize to/from TOML; every section uses `#[serde(default)]` so a
//! partial file only overrides what it names.

mod camera;
mod input;
mod lighting;
mod loader;

use std::path::Path;

pub use camera::CameraOptions;
pub use input::InputOptions;
pub use lighting::LightingOptions;
pub use loader::LoaderOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AnatomicaError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection, command and gesture parameters.
    pub camera: CameraOptions,
    /// Light rig parameters.
    pub lighting: LightingOptions,
    /// Pointer and touch gesture parameters.
    pub input: InputOptions,
    /// Asset retrieval parameters.
    #[schemars(skip)]
    pub loader: LoaderOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::OptionsParse`] for malformed TOML or a field of
    /// the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, AnatomicaError> {
        toml::from_str(content)
            .map_err(|e| AnatomicaError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self, AnatomicaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::OptionsParse`] if serialization fails and
    /// [`AnatomicaError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), AnatomicaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AnatomicaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
