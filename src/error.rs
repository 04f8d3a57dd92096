//! Crate-level error types.

use std::fmt;

/// Errors produced by the anatomica crate.
#[derive(Debug)]
pub enum AnatomicaError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn the background asset worker.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Specimen catalog parsing/validation failure.
    CatalogParse(String),
    /// A specimen id that the catalog does not contain.
    UnknownSpecimen(String),
    /// A host command string that could not be parsed.
    UnknownCommand(String),
}

impl fmt::Display for AnatomicaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn asset worker: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::CatalogParse(msg) => {
                write!(f, "catalog parse error: {msg}")
            }
            Self::UnknownSpecimen(id) => write!(f, "unknown specimen: {id}"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
        }
    }
}

impl std::error::Error for AnatomicaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnatomicaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Failure while resolving a specimen asset.
///
/// Always recovered inside the viewport: the load state moves to
/// [`Failed`](crate::asset::AssetLoadState::Failed) and a fallback is
/// rendered. Hosts never receive this as an error return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLoadError {
    /// The asset bytes could not be retrieved.
    Fetch {
        /// Locator that was requested.
        asset_ref: String,
        /// Underlying failure description.
        message: String,
    },
    /// The bytes were retrieved but do not describe a usable scene.
    Parse {
        /// Locator that was requested.
        asset_ref: String,
        /// Underlying failure description.
        message: String,
    },
    /// The background loader has shut down.
    WorkerUnavailable,
}

impl AssetLoadError {
    pub(crate) fn fetch(asset_ref: &str, message: impl fmt::Display) -> Self {
        Self::Fetch {
            asset_ref: asset_ref.to_owned(),
            message: message.to_string(),
        }
    }

    pub(crate) fn parse(asset_ref: &str, message: impl fmt::Display) -> Self {
        Self::Parse {
            asset_ref: asset_ref.to_owned(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { asset_ref, message } => {
                write!(f, "failed to fetch {asset_ref}: {message}")
            }
            Self::Parse { asset_ref, message } => {
                write!(f, "failed to parse {asset_ref}: {message}")
            }
            Self::WorkerUnavailable => write!(f, "asset worker unavailable"),
        }
    }
}

impl std::error::Error for AssetLoadError {}

/// A configuration value that cannot be honoured as given.
///
/// Never surfaced to hosts: callers normalize to a safe default and log.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidConfigurationError {
    /// A scale vector with a component count other than 1 or 3.
    ScaleArity(usize),
    /// A scale component that is non-finite or not strictly positive.
    ScaleComponent(f32),
    /// Distance bounds that are non-finite, non-positive, or inverted.
    DistanceBounds {
        /// Requested minimum distance.
        min: f32,
        /// Requested maximum distance.
        max: f32,
    },
}

impl fmt::Display for InvalidConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScaleArity(n) => {
                write!(f, "scale must have 1 or 3 components, got {n}")
            }
            Self::ScaleComponent(v) => {
                write!(f, "scale component {v} is not a positive number")
            }
            Self::DistanceBounds { min, max } => {
                write!(f, "invalid distance bounds [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for InvalidConfigurationError {}
