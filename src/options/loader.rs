use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Asset retrieval parameters.
pub struct LoaderOptions {
    /// Directory that relative asset references resolve against.
    pub assets_root: PathBuf,
    /// Whether `http://` / `https://` references may be fetched.
    pub allow_network: bool,
    /// Largest asset body accepted from the network, in bytes.
    pub max_asset_bytes: u64,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("assets"),
            allow_network: true,
            max_asset_bytes: 64 * 1024 * 1024,
        }
    }
}
