use std::f32::consts::FRAC_PI_2;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::CameraPreset;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection, command and gesture parameters.
///
/// The distance fields are the fallback preset for specimens whose catalog
/// entry carries no camera preset of its own.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Factor applied by a single zoom-in / zoom-out command.
    #[schemars(title = "Zoom Step", range(min = 1.05, max = 3.0), extend("step" = 0.05))]
    pub zoom_factor: f32,
    /// Azimuthal step (radians) applied by a single rotate command.
    #[schemars(title = "Rotate Step", range(min = 0.05, max = 3.15), extend("step" = 0.05))]
    pub rotate_step: f32,
    /// Drag-rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Drag-pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Dolly sensitivity per wheel notch / pinch unit.
    #[schemars(title = "Dolly Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub dolly_speed: f32,
    /// Initial orbit distance.
    #[schemars(skip)]
    pub distance: f32,
    /// Closest allowed orbit distance.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    #[schemars(skip)]
    pub max_distance: f32,
    /// Exponential smoothing per 1/60 s frame (0 disables damping).
    #[schemars(title = "Damping", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub damping_factor: f32,
    /// Spin the specimen slowly while nobody is interacting with it.
    #[schemars(title = "Auto Rotate")]
    pub auto_rotate: bool,
    /// Idle spin speed; 1.0 is one turn per minute.
    #[schemars(title = "Auto Rotate Speed", range(min = 0.0, max = 4.0), extend("step" = 0.1))]
    pub auto_rotate_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        let preset = CameraPreset::default();
        Self {
            fovy: 50.0,
            znear: 0.01,
            zfar: 100.0,
            zoom_factor: 1.2,
            rotate_step: FRAC_PI_2,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            dolly_speed: 0.1,
            distance: preset.distance,
            min_distance: preset.min_distance,
            max_distance: preset.max_distance,
            damping_factor: preset.damping_factor,
            auto_rotate: true,
            auto_rotate_speed: 0.5,
        }
    }
}

impl CameraOptions {
    /// Camera preset used when a specimen does not define its own.
    #[must_use]
    pub fn preset(&self) -> CameraPreset {
        CameraPreset {
            distance: self.distance,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
            damping_factor: self.damping_factor,
            ..CameraPreset::default()
        }
    }
}
