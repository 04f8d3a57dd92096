//! Shared utilities.

/// Frame pacing for interactive and headless drivers.
pub mod frame_timing;

pub use frame_timing::FrameTiming;
