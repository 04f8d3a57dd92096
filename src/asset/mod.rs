//! Specimen asset resolution.
//!
//! An asset reference is either a 3D scene (`.glb` / `.gltf`) or a flat
//! image (anything else). Flat images resolve immediately with no fetch;
//! 3D scenes are fetched and parsed on a background worker, memoized per
//! reference, and guarded by a load-generation counter so a superseded
//! request can never overwrite the current specimen.

/// Background loader, load states and generation tracking.
pub mod loader;
/// Parsed scene geometry.
pub mod scene;
/// Byte sources (file system, HTTP, memory).
pub mod source;

use std::sync::Arc;

pub use loader::{
    AssetLoadState, AssetLoader, LoadEvent, LoadTicket, LoadTracker,
};
pub use scene::{Bounds, LoadedScene, ScenePrimitive};
pub use source::{AssetSource, DefaultSource, FileSource, MemorySource};

/// Which rendering branch an asset reference takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// glTF / GLB scene rendered in 3D with camera control.
    Scene,
    /// Anything else, presented as a flat 2D image.
    FlatImage,
}

impl AssetKind {
    /// Classify a reference by its file suffix. Query strings and
    /// fragments are ignored; the comparison is case-insensitive.
    #[must_use]
    pub fn of(asset_ref: &str) -> Self {
        let path = source::strip_query(asset_ref.trim());
        let extension = path
            .rsplit_once('.')
            .filter(|(_, ext)| !ext.contains('/'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("glb" | "gltf") => Self::Scene,
            _ => Self::FlatImage,
        }
    }
}

/// A successfully resolved asset.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAsset {
    /// Parsed 3D scene, shared with the loader cache.
    Scene(Arc<LoadedScene>),
    /// Flat-image locator, handed to the host's 2D presentation as-is.
    FlatImage(String),
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// One triangle (0,0,0) (2,0,0) (0,4,0) under a node translated by
    /// (10,0,0), with the buffer embedded as a data URI.
    pub(crate) const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [ { "mesh": 0, "translation": [10.0, 0.0, 0.0] } ],
        "meshes": [
            { "name": "tri", "primitives": [ { "attributes": { "POSITION": 0 } } ] }
        ],
        "buffers": [ {
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAAAAQAAAAAAAAAAAAAAAAAAAgEAAAAAA"
        } ],
        "bufferViews": [ { "buffer": 0, "byteOffset": 0, "byteLength": 36 } ],
        "accessors": [ {
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [2.0, 4.0, 0.0]
        } ]
    }"#;

    /// The same triangle with its buffer in a sibling `tri.bin`.
    pub(crate) const TRIANGLE_GLTF_EXTERNAL: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [ { "mesh": 0, "translation": [10.0, 0.0, 0.0] } ],
        "meshes": [
            { "name": "tri", "primitives": [ { "attributes": { "POSITION": 0 } } ] }
        ],
        "buffers": [ { "byteLength": 36, "uri": "tri.bin" } ],
        "bufferViews": [ { "buffer": 0, "byteOffset": 0, "byteLength": 36 } ],
        "accessors": [ {
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [2.0, 4.0, 0.0]
        } ]
    }"#;

    /// Little-endian vertex data for [`TRIANGLE_GLTF_EXTERNAL`].
    pub(crate) fn triangle_bin() -> Vec<u8> {
        [0.0f32, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 4.0, 0.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_suffixes_select_the_3d_branch() {
        assert_eq!(AssetKind::of("models/heart.glb"), AssetKind::Scene);
        assert_eq!(AssetKind::of("models/Heart.GLTF"), AssetKind::Scene);
        assert_eq!(
            AssetKind::of("https://cdn.example.org/skull.glb?v=3#top"),
            AssetKind::Scene
        );
    }

    #[test]
    fn everything_else_is_a_flat_image() {
        assert_eq!(AssetKind::of("skeleton.png"), AssetKind::FlatImage);
        assert_eq!(
            AssetKind::of("https://upload.example.org/diagram.svg.png"),
            AssetKind::FlatImage
        );
        assert_eq!(AssetKind::of("models.glb/readme"), AssetKind::FlatImage);
        assert_eq!(AssetKind::of(""), AssetKind::FlatImage);
    }
}
