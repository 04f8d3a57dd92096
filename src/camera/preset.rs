use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::InvalidConfigurationError;

/// Closest the polar angle may come to either pole.
pub(crate) const POLAR_EPSILON: f32 = 1.0e-3;

/// Mount-time camera placement and distance limits for one specimen.
///
/// Distance limits belong to the specimen rather than being global: large
/// subjects (a full skeleton) need a farther `max_distance` than a single
/// organ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPreset {
    /// Initial orbit distance.
    pub distance: f32,
    /// Initial azimuthal angle in radians (0 looks down -Z from +Z).
    pub azimuthal_angle: f32,
    /// Initial polar angle in radians, measured from +Y.
    pub polar_angle: f32,
    /// Closest allowed orbit distance.
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    pub max_distance: f32,
    /// Exponential smoothing per 1/60 s frame (0 disables damping).
    pub damping_factor: f32,
    /// Per-specimen override of the idle auto-rotation switch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_rotate: Option<bool>,
}

impl Default for CameraPreset {
    fn default() -> Self {
        Self {
            distance: 3.0,
            azimuthal_angle: 0.0,
            polar_angle: FRAC_PI_2,
            min_distance: 0.3,
            max_distance: 8.0,
            damping_factor: 0.05,
            auto_rotate: None,
        }
    }
}

impl CameraPreset {
    /// Check the distance limits.
    ///
    /// # Errors
    ///
    /// [`InvalidConfigurationError::DistanceBounds`] unless both limits are
    /// finite, `min_distance > 0` and `min_distance <= max_distance`.
    pub fn check_bounds(&self) -> Result<(), InvalidConfigurationError> {
        let (min, max) = (self.min_distance, self.max_distance);
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            Ok(())
        } else {
            Err(InvalidConfigurationError::DistanceBounds { min, max })
        }
    }

    /// Return a copy that satisfies every camera invariant.
    ///
    /// Invalid distance limits fall back to the defaults; the initial
    /// distance is clamped into the limits; angles and damping are
    /// sanitized.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut out = *self;

        if let Err(e) = self.check_bounds() {
            log::warn!(
                "{e}; using [{}, {}]",
                defaults.min_distance,
                defaults.max_distance
            );
            out.min_distance = defaults.min_distance;
            out.max_distance = defaults.max_distance;
        }
        out.distance = if out.distance.is_finite() {
            out.distance.clamp(out.min_distance, out.max_distance)
        } else {
            defaults.distance.clamp(out.min_distance, out.max_distance)
        };
        if !out.azimuthal_angle.is_finite() {
            out.azimuthal_angle = defaults.azimuthal_angle;
        }
        out.polar_angle = if out.polar_angle.is_finite() {
            out.polar_angle
                .clamp(POLAR_EPSILON, PI - POLAR_EPSILON)
        } else {
            defaults.polar_angle
        };
        out.damping_factor = if out.damping_factor.is_finite() {
            out.damping_factor.clamp(0.0, 1.0)
        } else {
            defaults.damping_factor
        };
        out
    }

    /// The state a camera mounted with this preset starts in.
    #[must_use]
    pub fn initial_state(&self) -> CameraState {
        CameraState {
            distance: self.distance,
            azimuthal_angle: self.azimuthal_angle,
            polar_angle: self.polar_angle,
            target: Vec3::ZERO,
            damping_factor: self.damping_factor,
        }
    }
}

/// Snapshot of an orbit camera's commanded state.
///
/// Returned by value from [`CameraHandle::state`](super::CameraHandle::state);
/// writing to a snapshot never affects the live camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Radial distance from the orbit target.
    pub distance: f32,
    /// Rotation around the vertical axis, unbounded (equivalent mod 2π).
    pub azimuthal_angle: f32,
    /// Elevation measured from +Y, kept strictly between the poles.
    pub polar_angle: f32,
    /// Orbit center (moved by panning).
    pub target: Vec3,
    /// Exponential smoothing per 1/60 s frame.
    pub damping_factor: f32,
}

impl CameraState {
    /// Azimuthal angle wrapped into `[0, 2π)`.
    #[must_use]
    pub fn normalized_azimuth(&self) -> f32 {
        self.azimuthal_angle.rem_euclid(TAU)
    }

    /// Unit vector from the orbit target toward the eye.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar_angle.sin_cos();
        let (sin_az, cos_az) = self.azimuthal_angle.sin_cos();
        Vec3::new(sin_polar * sin_az, cos_polar, sin_polar * cos_az)
    }

    /// World-space eye position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.target + self.direction() * self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_is_valid() {
        let preset = CameraPreset::default();
        assert!(preset.check_bounds().is_ok());
        assert_eq!(preset.sanitized(), preset);
    }

    #[test]
    fn inverted_bounds_fall_back_to_defaults() {
        let preset = CameraPreset {
            min_distance: 5.0,
            max_distance: 1.0,
            ..CameraPreset::default()
        };
        assert!(matches!(
            preset.check_bounds(),
            Err(InvalidConfigurationError::DistanceBounds { .. })
        ));
        let fixed = preset.sanitized();
        assert_eq!(fixed.min_distance, 0.3);
        assert_eq!(fixed.max_distance, 8.0);
    }

    #[test]
    fn initial_distance_is_clamped_into_bounds() {
        let preset = CameraPreset {
            distance: 40.0,
            max_distance: 16.0,
            ..CameraPreset::default()
        };
        assert_eq!(preset.sanitized().distance, 16.0);
    }

    #[test]
    fn default_eye_sits_on_positive_z() {
        let state = CameraPreset::default().initial_state();
        let eye = state.eye();
        assert!(eye.x.abs() < 1e-5);
        assert!(eye.y.abs() < 1e-5);
        assert!((eye.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn normalized_azimuth_wraps_negative_angles() {
        let state = CameraState {
            azimuthal_angle: -FRAC_PI_2,
            ..CameraPreset::default().initial_state()
        };
        assert!((state.normalized_azimuth() - 3.0 * FRAC_PI_2).abs() < 1e-5);
    }
}
