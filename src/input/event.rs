/// Platform-agnostic input events.
///
/// These are fed into a [`GestureProcessor`](super::GestureProcessor)
/// which converts them into
/// [`ViewportCommand`](crate::viewport::ViewportCommand) values.
///
/// # Example
///
/// ```ignore
/// viewport.handle_input(InputEvent::CursorMoved { x: 100.0, y: 200.0 });
/// viewport.handle_input(InputEvent::Scroll { delta: 1.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute screen position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Scroll amount in notches (positive = zoom in).
        delta: f32,
    },
    /// A finger touched the surface.
    TouchStart {
        /// Stable identifier for this finger until it lifts.
        id: u64,
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// A touching finger moved.
    TouchMove {
        /// Identifier given at [`InputEvent::TouchStart`].
        id: u64,
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// A finger lifted or the touch was cancelled.
    TouchEnd {
        /// Identifier given at [`InputEvent::TouchStart`].
        id: u64,
    },
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}
