use std::sync::Arc;

use glam::Mat4;

use super::lighting::LightingUniform;
use crate::asset::LoadedScene;
use crate::camera::core::CameraUniform;
use crate::catalog::ImageMarker;

/// What the viewport shows this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportFrame {
    /// Nothing has been requested yet.
    Empty,
    /// A placeholder while the scene is unavailable.
    Fallback(Fallback),
    /// A mounted 3D scene with camera control.
    Scene(SceneFrame),
    /// A flat image with hotspot markers; no camera control.
    FlatImage {
        /// Image locator, passed to the host's 2D presenter untouched.
        locator: String,
        /// Hotspots in normalized image coordinates.
        markers: Vec<ImageMarker>,
    },
}

/// Placeholder variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// The current asset is still being fetched or parsed.
    Loading,
    /// The current asset could not be resolved.
    Failed {
        /// Human-readable reason.
        message: String,
    },
}

/// Everything a renderer needs to draw one frame of a 3D specimen.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    /// Parsed geometry.
    pub scene: Arc<LoadedScene>,
    /// Normalization and specimen scale, applied to every primitive's own
    /// transform.
    pub model: Mat4,
    /// Camera block for the damped pose.
    pub camera: CameraUniform,
    /// Light rig block.
    pub lighting: LightingUniform,
}

impl ViewportFrame {
    /// Whether this frame carries camera-controllable 3D content.
    #[must_use]
    pub fn is_scene(&self) -> bool {
        matches!(self, Self::Scene(_))
    }
}
