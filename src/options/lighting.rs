use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Viewport light rig: one ambient and two directional sources.
pub struct LightingOptions {
    /// Ambient light intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub ambient: f32,
    /// Key (primary directional) light intensity.
    #[schemars(title = "Key Light", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub key_intensity: f32,
    /// Fill (secondary directional) light intensity.
    #[schemars(title = "Fill Light", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub fill_intensity: f32,
    /// World-space position of the key light (it points at the origin).
    #[schemars(skip)]
    pub key_position: [f32; 3],
    /// World-space position of the fill light (it points at the origin).
    #[schemars(skip)]
    pub fill_position: [f32; 3],
    /// Light color shared by all three sources.
    #[schemars(skip)]
    pub color: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            key_intensity: 1.0,
            fill_intensity: 0.5,
            key_position: [10.0, 10.0, 5.0],
            fill_position: [-10.0, -10.0, -5.0],
            color: [1.0, 1.0, 1.0],
        }
    }
}
