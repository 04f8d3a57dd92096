//! The viewport's complete interactive vocabulary.
//!
//! Every camera operation, whether it comes from a host button, a pointer
//! drag, a wheel notch or a pinch, is a `ViewportCommand` passed to
//! [`Viewport::execute`](super::Viewport::execute). Interaction-mode
//! changes are deliberately absent: the mode is host state pushed through
//! [`ViewportConfig`](super::ViewportConfig), not a camera command.

use glam::Vec2;

/// A discrete or parameterized camera operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportCommand {
    // ── Host buttons ────────────────────────────────────────────────
    /// Zoom in by the configured step.
    ZoomIn,
    /// Zoom out by the configured step.
    ZoomOut,
    /// Rotate by the configured azimuthal step.
    Rotate,
    /// Restore the mount-time camera placement.
    Reset,

    // ── Gestures ────────────────────────────────────────────────────
    /// Orbit by `delta` pixels of drag.
    Orbit {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },
    /// Pan by `delta` pixels of drag.
    Pan {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },
    /// Dolly (positive = closer).
    Dolly {
        /// Wheel notches or pinch units.
        delta: f32,
    },
}
