//! Orbit camera for the specimen viewport.
//!
//! [`OrbitCamera`] owns the commanded [`CameraState`] and a damped render
//! pose; [`CameraHandle`] is the host-facing command surface that stays
//! valid across specimen remounts and silently ignores commands while no
//! scene is attached.

/// Orbit state machine: zoom, rotate, reset, drag gestures and damping.
pub mod controller;
/// Perspective camera and GPU uniform types.
pub mod core;
/// Host-facing command handle.
pub mod handle;
/// Mount-time camera presets and state snapshots.
pub mod preset;

pub use controller::OrbitCamera;
pub use handle::CameraHandle;
pub use preset::{CameraPreset, CameraState};
