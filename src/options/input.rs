use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Input", inline)]
#[serde(default)]
/// Pointer and touch gesture parameters.
pub struct InputOptions {
    /// Pointer travel (pixels) before a press becomes a drag.
    #[schemars(title = "Drag Threshold", range(min = 0.0, max = 20.0), extend("step" = 0.5))]
    pub drag_threshold: f32,
    /// Pinch spread change (pixels) that counts as one dolly unit.
    #[schemars(title = "Pinch Sensitivity", range(min = 5.0, max = 200.0), extend("step" = 5.0))]
    pub pinch_pixels_per_step: f32,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            drag_threshold: 2.0,
            pinch_pixels_per_step: 40.0,
        }
    }
}
