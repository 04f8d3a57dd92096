use base64::Engine as _;
use glam::{Mat4, Vec3};

use super::source::{is_remote, strip_query, AssetSource};
use crate::error::AssetLoadError;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Bounds {
    /// Box containing nothing; growing it with a point yields that point.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Grow the box to contain `point`.
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Whether the box contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Longest edge length.
    #[must_use]
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }
}

/// One drawable mesh primitive of a loaded scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePrimitive {
    /// Name of the owning glTF mesh, when present.
    pub mesh_name: Option<String>,
    /// Vertex positions in the primitive's local space.
    pub positions: Vec<Vec3>,
    /// Vertex normals, when the asset provides them.
    pub normals: Option<Vec<Vec3>>,
    /// Triangle-list indices; `None` means positions are already a list.
    pub indices: Option<Vec<u32>>,
    /// Local-to-scene transform accumulated through the node hierarchy.
    pub transform: Mat4,
}

impl ScenePrimitive {
    /// Number of triangles this primitive draws.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.positions.len(), Vec::len)
            / 3
    }
}

/// A parsed 3D specimen scene, ready for centering and upload.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedScene {
    /// Locator the scene was loaded from.
    pub asset_ref: String,
    /// Triangle primitives in document order.
    pub primitives: Vec<ScenePrimitive>,
    /// Scene-space bounds of all primitives.
    pub bounds: Bounds,
}

impl LoadedScene {
    /// Parse a self-contained glTF (JSON with `data:` buffers) or GLB
    /// document.
    ///
    /// # Errors
    ///
    /// [`AssetLoadError::Parse`] when the bytes are not a valid document,
    /// reference an external buffer, or contain no triangle geometry.
    pub fn from_gltf_slice(
        asset_ref: &str,
        bytes: &[u8],
    ) -> Result<Self, AssetLoadError> {
        Self::parse(asset_ref, bytes, &mut |uri| {
            Err(AssetLoadError::parse(
                asset_ref,
                format!("external buffer {uri} needs an asset source"),
            ))
        })
    }

    /// Parse a glTF or GLB document, fetching external buffers from
    /// `source`.
    ///
    /// Relative buffer URIs resolve against the directory of `asset_ref`,
    /// so `models/heart.gltf` referencing `heart.bin` fetches
    /// `models/heart.bin`. Uses the document's default scene, falling back
    /// to its first scene. Only triangle primitives are kept.
    ///
    /// # Errors
    ///
    /// [`AssetLoadError::Fetch`] when an external buffer cannot be fetched;
    /// [`AssetLoadError::Parse`] when the document is invalid, a buffer is
    /// shorter than declared, or there is no triangle geometry.
    pub fn from_gltf_with_source(
        asset_ref: &str,
        bytes: &[u8],
        source: &mut dyn AssetSource,
    ) -> Result<Self, AssetLoadError> {
        Self::parse(asset_ref, bytes, &mut |reference| source.fetch(reference))
    }

    fn parse(
        asset_ref: &str,
        bytes: &[u8],
        fetch: &mut dyn FnMut(&str) -> Result<Vec<u8>, AssetLoadError>,
    ) -> Result<Self, AssetLoadError> {
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)
            .map_err(|e| AssetLoadError::parse(asset_ref, e))?;
        let buffers = load_buffers(asset_ref, &document, blob, fetch)?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| {
                AssetLoadError::parse(asset_ref, "document has no scenes")
            })?;

        let mut primitives = Vec::new();
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, &buffers, &mut primitives);
        }

        let mut bounds = Bounds::EMPTY;
        for primitive in &primitives {
            for &p in &primitive.positions {
                bounds.include(primitive.transform.transform_point3(p));
            }
        }
        if primitives.is_empty() || bounds.is_empty() {
            return Err(AssetLoadError::parse(
                asset_ref,
                "no triangle geometry",
            ));
        }

        log::debug!(
            "parsed {asset_ref}: {} primitives, {} triangles",
            primitives.len(),
            primitives
                .iter()
                .map(ScenePrimitive::triangle_count)
                .sum::<usize>()
        );

        Ok(Self {
            asset_ref: asset_ref.to_owned(),
            primitives,
            bounds,
        })
    }

    /// Total vertex count across primitives.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.positions.len()).sum()
    }
}

/// Bytes of every buffer in document order.
fn load_buffers(
    asset_ref: &str,
    document: &gltf::Document,
    mut blob: Option<Vec<u8>>,
    fetch: &mut dyn FnMut(&str) -> Result<Vec<u8>, AssetLoadError>,
) -> Result<Vec<Vec<u8>>, AssetLoadError> {
    let mut buffers = Vec::new();
    for buffer in document.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => blob.take().ok_or_else(|| {
                AssetLoadError::parse(asset_ref, "missing GLB binary chunk")
            })?,
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                let payload = uri
                    .split_once(',')
                    .filter(|(header, _)| header.ends_with(";base64"))
                    .map(|(_, payload)| payload)
                    .ok_or_else(|| {
                        AssetLoadError::parse(asset_ref, "unsupported data URI")
                    })?;
                base64::engine::general_purpose::STANDARD
                    .decode(payload)
                    .map_err(|e| {
                        AssetLoadError::parse(
                            asset_ref,
                            format!("buffer {}: {e}", buffer.index()),
                        )
                    })?
            }
            gltf::buffer::Source::Uri(uri) => {
                let reference = resolve_relative(asset_ref, uri);
                log::debug!("fetching buffer {reference} for {asset_ref}");
                fetch(&reference)?
            }
        };
        if data.len() < buffer.length() {
            return Err(AssetLoadError::parse(
                asset_ref,
                format!(
                    "buffer {} holds {} of {} bytes",
                    buffer.index(),
                    data.len(),
                    buffer.length()
                ),
            ));
        }
        buffers.push(data);
    }
    Ok(buffers)
}

/// Resolve a buffer URI against the directory of the document that
/// references it. Absolute URLs and paths are returned unchanged.
fn resolve_relative(asset_ref: &str, uri: &str) -> String {
    if is_remote(uri) || uri.starts_with("file://") || uri.starts_with('/') {
        return uri.to_owned();
    }
    match strip_query(asset_ref).rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{uri}"),
        None => uri.to_owned(),
    }
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[Vec<u8>],
    out: &mut Vec<ScenePrimitive>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("skipping {:?} primitive", primitive.mode());
                continue;
            }
            let reader = primitive.reader(|buffer| {
                buffers.get(buffer.index()).map(Vec::as_slice)
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            out.push(ScenePrimitive {
                mesh_name: mesh.name().map(str::to_owned),
                positions: positions.map(Vec3::from_array).collect(),
                normals: reader
                    .read_normals()
                    .map(|normals| normals.map(Vec3::from_array).collect()),
                indices: reader
                    .read_indices()
                    .map(|indices| indices.into_u32().collect()),
                transform: world,
            });
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{fixtures, MemorySource};

    #[test]
    fn parses_embedded_triangle_with_node_transform() {
        let scene = LoadedScene::from_gltf_slice(
            "tri.gltf",
            fixtures::TRIANGLE_GLTF.as_bytes(),
        )
        .unwrap();
        assert_eq!(scene.primitives.len(), 1);
        assert_eq!(scene.vertex_count(), 3);
        assert_eq!(scene.primitives[0].triangle_count(), 1);
        assert_eq!(scene.primitives[0].mesh_name.as_deref(), Some("tri"));
        assert_eq!(scene.bounds.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(scene.bounds.max, Vec3::new(12.0, 4.0, 0.0));
        assert_eq!(scene.bounds.center(), Vec3::new(11.0, 2.0, 0.0));
        assert_eq!(scene.bounds.max_extent(), 4.0);
    }

    #[test]
    fn external_buffer_resolves_next_to_the_document() {
        let mut source = MemorySource::new()
            .with_asset("models/tri.bin", fixtures::triangle_bin());
        let scene = LoadedScene::from_gltf_with_source(
            "models/tri.gltf",
            fixtures::TRIANGLE_GLTF_EXTERNAL.as_bytes(),
            &mut source,
        )
        .unwrap();
        assert_eq!(scene.vertex_count(), 3);
        assert_eq!(scene.bounds.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(scene.bounds.max, Vec3::new(12.0, 4.0, 0.0));
    }

    #[test]
    fn missing_or_short_external_buffer_fails() {
        let mut empty = MemorySource::new();
        let err = LoadedScene::from_gltf_with_source(
            "models/tri.gltf",
            fixtures::TRIANGLE_GLTF_EXTERNAL.as_bytes(),
            &mut empty,
        )
        .unwrap_err();
        assert!(
            matches!(&err, AssetLoadError::Fetch { asset_ref, .. } if asset_ref == "models/tri.bin")
        );

        let mut short = MemorySource::new().with_asset("models/tri.bin", vec![0u8; 12]);
        let err = LoadedScene::from_gltf_with_source(
            "models/tri.gltf",
            fixtures::TRIANGLE_GLTF_EXTERNAL.as_bytes(),
            &mut short,
        )
        .unwrap_err();
        assert!(matches!(err, AssetLoadError::Parse { .. }));

        let err = LoadedScene::from_gltf_slice(
            "models/tri.gltf",
            fixtures::TRIANGLE_GLTF_EXTERNAL.as_bytes(),
        )
        .unwrap_err();
        assert!(matches!(err, AssetLoadError::Parse { .. }));
    }

    #[test]
    fn buffer_uris_resolve_against_the_document_directory() {
        assert_eq!(resolve_relative("models/heart.gltf", "heart.bin"), "models/heart.bin");
        assert_eq!(
            resolve_relative("https://cdn.example.org/m/skull.gltf?v=2", "skull.bin"),
            "https://cdn.example.org/m/skull.bin"
        );
        assert_eq!(resolve_relative("skull.gltf", "skull.bin"), "skull.bin");
        assert_eq!(
            resolve_relative("models/a.gltf", "https://cdn.example.org/a.bin"),
            "https://cdn.example.org/a.bin"
        );
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let err =
            LoadedScene::from_gltf_slice("bad.glb", b"not a model").unwrap_err();
        assert!(matches!(err, AssetLoadError::Parse { .. }));
    }

    #[test]
    fn empty_bounds_report_empty() {
        assert!(Bounds::EMPTY.is_empty());
        let mut b = Bounds::EMPTY;
        b.include(Vec3::ONE);
        assert!(!b.is_empty());
        assert_eq!(b.size(), Vec3::ZERO);
    }
}
