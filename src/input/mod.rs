//! Input handling: platform-agnostic events, the interaction mode switch,
//! and the gesture processor that turns raw events into viewport commands.

/// Platform-agnostic input events.
pub mod event;
/// Rotate-primary vs pan-primary gesture mapping.
pub mod mode;
/// Converts raw events into viewport commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use mode::{GestureAction, InteractionMode};
pub use processor::GestureProcessor;
