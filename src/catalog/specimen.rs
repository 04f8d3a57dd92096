use serde::{Deserialize, Serialize};

use super::scale::SpecimenScale;
use crate::camera::CameraPreset;

/// One anatomical specimen the dashboard can show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specimen {
    /// Stable key used for selection (`"Skeletal"`, `"Circulatory"`, ...).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Body-system label shown under the title.
    #[serde(default)]
    pub system_label: String,
    /// Free-text description for the info panel.
    #[serde(default)]
    pub description: String,
    /// 3D asset locator (`.glb` / `.gltf`) or a flat-image locator.
    pub asset_ref: String,
    /// Icon name for the system list.
    #[serde(default)]
    pub icon_id: String,
    /// Optional scale; absent means 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<SpecimenScale>,
    /// Optional mount-time camera placement and distance limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraPreset>,
    /// Hotspots drawn over the flat-image presentation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<ImageMarker>,
}

/// A labelled hotspot positioned in normalized image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMarker {
    /// Tooltip text.
    pub label: String,
    /// Horizontal position, 0 = left edge, 1 = right edge.
    pub x: f32,
    /// Vertical position, 0 = top edge, 1 = bottom edge.
    pub y: f32,
}

impl ImageMarker {
    /// Create a marker.
    #[must_use]
    pub fn new(label: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }
}

impl Specimen {
    /// The specimen's scale, identity when unset.
    #[must_use]
    pub fn effective_scale(&self) -> SpecimenScale {
        self.scale.unwrap_or_default()
    }
}
