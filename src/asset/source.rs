//! Byte sources for specimen assets.
//!
//! The loader worker owns exactly one [`AssetSource`]; transport is opaque
//! to everything above it.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::AssetLoadError;
use crate::options::LoaderOptions;

/// Retrieves the raw bytes behind an asset reference.
pub trait AssetSource: Send {
    /// Fetch the bytes for `asset_ref`.
    ///
    /// # Errors
    ///
    /// [`AssetLoadError::Fetch`] when the asset cannot be retrieved.
    fn fetch(&mut self, asset_ref: &str) -> Result<Vec<u8>, AssetLoadError>;
}

/// Whether `asset_ref` names an HTTP(S) resource.
#[must_use]
pub fn is_remote(asset_ref: &str) -> bool {
    let lower = asset_ref.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads assets from the local file system.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Resolve relative references against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path a reference resolves to. `file://` prefixes are stripped and
    /// absolute paths are used as-is.
    #[must_use]
    pub fn resolve(&self, asset_ref: &str) -> PathBuf {
        let stripped = asset_ref.strip_prefix("file://").unwrap_or(asset_ref);
        let stripped = strip_query(stripped);
        let path = Path::new(stripped);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetSource for FileSource {
    fn fetch(&mut self, asset_ref: &str) -> Result<Vec<u8>, AssetLoadError> {
        let path = self.resolve(asset_ref);
        std::fs::read(&path).map_err(|e| {
            AssetLoadError::fetch(asset_ref, format!("{}: {e}", path.display()))
        })
    }
}

/// Downloads assets over HTTP(S).
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    max_bytes: u64,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Accept bodies up to `max_bytes`.
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

#[cfg(feature = "http")]
impl AssetSource for HttpSource {
    fn fetch(&mut self, asset_ref: &str) -> Result<Vec<u8>, AssetLoadError> {
        log::info!("downloading {asset_ref}");
        let mut response = ureq::get(asset_ref)
            .call()
            .map_err(|e| AssetLoadError::fetch(asset_ref, e))?;
        response
            .body_mut()
            .with_config()
            .limit(self.max_bytes)
            .read_to_vec()
            .map_err(|e| AssetLoadError::fetch(asset_ref, e))
    }
}

/// File-system source with optional network access, configured from
/// [`LoaderOptions`].
#[derive(Debug, Clone)]
pub struct DefaultSource {
    files: FileSource,
    allow_network: bool,
    #[cfg(feature = "http")]
    http: HttpSource,
}

impl DefaultSource {
    /// Build from loader options.
    #[must_use]
    pub fn from_options(options: &LoaderOptions) -> Self {
        Self {
            files: FileSource::new(options.assets_root.clone()),
            allow_network: options.allow_network,
            #[cfg(feature = "http")]
            http: HttpSource::new(options.max_asset_bytes),
        }
    }
}

impl AssetSource for DefaultSource {
    fn fetch(&mut self, asset_ref: &str) -> Result<Vec<u8>, AssetLoadError> {
        if !is_remote(asset_ref) {
            return self.files.fetch(asset_ref);
        }
        if !self.allow_network {
            return Err(AssetLoadError::fetch(
                asset_ref,
                "network access disabled",
            ));
        }
        #[cfg(feature = "http")]
        {
            self.http.fetch(asset_ref)
        }
        #[cfg(not(feature = "http"))]
        {
            Err(AssetLoadError::fetch(
                asset_ref,
                "built without the `http` feature",
            ))
        }
    }
}

/// In-memory assets keyed by reference, for embedded or pre-fetched data.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: FxHashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `asset_ref`, replacing any previous entry.
    #[must_use]
    pub fn with_asset(mut self, asset_ref: &str, bytes: impl Into<Vec<u8>>) -> Self {
        drop(self.assets.insert(asset_ref.to_owned(), bytes.into()));
        self
    }
}

impl AssetSource for MemorySource {
    fn fetch(&mut self, asset_ref: &str) -> Result<Vec<u8>, AssetLoadError> {
        self.assets
            .get(asset_ref)
            .cloned()
            .ok_or_else(|| AssetLoadError::fetch(asset_ref, "not found"))
    }
}

/// Drop any `?query` or `#fragment` suffix.
pub(crate) fn strip_query(asset_ref: &str) -> &str {
    asset_ref
        .split(['?', '#'])
        .next()
        .unwrap_or(asset_ref)
}
