//! Converts raw platform events into viewport commands.
//!
//! The `GestureProcessor` owns all transient pointer state (cursor
//! position, the active mouse drag, active touches) and the current
//! [`InteractionMode`]. The drag action is latched when a gesture starts,
//! so a mode change only affects the next gesture and never reinterprets
//! a stroke in progress.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use super::mode::{GestureAction, InteractionMode};
use crate::options::InputOptions;
use crate::viewport::ViewportCommand;

/// Mouse drag in progress.
#[derive(Debug, Clone, Copy)]
struct MouseDrag {
    button: MouseButton,
    action: GestureAction,
    travelled: f32,
    dragging: bool,
}

/// Touch gesture in progress.
#[derive(Debug, Clone, Copy)]
enum TouchGesture {
    /// One finger: the mode's primary action.
    Single {
        id: u64,
        travelled: f32,
        dragging: bool,
    },
    /// Two fingers: pinch dollies, centroid motion gets the secondary
    /// action.
    Double { centroid: Vec2, spread: f32 },
}

/// Converts raw window events into [`ViewportCommand`]s.
///
/// # Usage
///
/// ```ignore
/// for cmd in processor.handle_event(event) {
///     viewport.execute(cmd);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GestureProcessor {
    mode: InteractionMode,
    drag_threshold: f32,
    pinch_pixels_per_step: f32,
    cursor: Option<Vec2>,
    mouse: Option<MouseDrag>,
    touches: Vec<(u64, Vec2)>,
    /// Mode latched when the first finger landed.
    touch_mode: Option<InteractionMode>,
    touch: Option<TouchGesture>,
}

impl GestureProcessor {
    /// Create a processor in rotate-primary mode.
    #[must_use]
    pub fn new(options: &InputOptions) -> Self {
        Self {
            mode: InteractionMode::Rotate,
            drag_threshold: options.drag_threshold.max(0.0),
            pinch_pixels_per_step: options.pinch_pixels_per_step.max(1.0),
            cursor: None,
            mouse: None,
            touches: Vec::new(),
            touch_mode: None,
            touch: None,
        }
    }

    /// Current interaction mode (applies to the next gesture).
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch mode. Gestures already in progress keep their action.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if mode != self.mode {
            log::debug!("interaction mode -> {mode:?}");
        }
        self.mode = mode;
    }

    /// Whether a mouse drag or touch gesture is in progress.
    #[must_use]
    pub fn is_gesture_active(&self) -> bool {
        self.mouse.is_some() || !self.touches.is_empty()
    }

    /// Drop all in-progress gestures without emitting anything.
    pub fn cancel(&mut self) {
        self.mouse = None;
        self.touches.clear();
        self.touch_mode = None;
        self.touch = None;
    }

    /// Process a raw input event and return the resulting commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<ViewportCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.handle_cursor_moved(Vec2::new(x, y))
            }
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed);
                Vec::new()
            }
            InputEvent::Scroll { delta } if delta.is_finite() && delta != 0.0 => {
                vec![ViewportCommand::Dolly { delta }]
            }
            InputEvent::Scroll { .. } => Vec::new(),
            InputEvent::TouchStart { id, x, y } => {
                self.handle_touch_start(id, Vec2::new(x, y));
                Vec::new()
            }
            InputEvent::TouchMove { id, x, y } => {
                self.handle_touch_move(id, Vec2::new(x, y))
            }
            InputEvent::TouchEnd { id } => {
                self.handle_touch_end(id);
                Vec::new()
            }
        }
    }

    // ── Mouse ───────────────────────────────────────────────────────

    fn handle_cursor_moved(&mut self, pos: Vec2) -> Vec<ViewportCommand> {
        let delta = self.cursor.map_or(Vec2::ZERO, |last| pos - last);
        self.cursor = Some(pos);

        let threshold = self.drag_threshold;
        let Some(drag) = self.mouse.as_mut() else {
            return Vec::new();
        };
        if !advance_drag(&mut drag.travelled, &mut drag.dragging, delta, threshold)
        {
            return Vec::new();
        }
        let action = drag.action;
        self.drag_command(action, delta).into_iter().collect()
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            if self.mouse.is_none() {
                self.mouse = Some(MouseDrag {
                    button,
                    action: self.mode.action_for_button(button),
                    travelled: 0.0,
                    dragging: false,
                });
            }
        } else if self.mouse.is_some_and(|drag| drag.button == button) {
            self.mouse = None;
        }
    }

    // ── Touch ───────────────────────────────────────────────────────

    fn handle_touch_start(&mut self, id: u64, pos: Vec2) {
        if self.touches.iter().any(|(t, _)| *t == id) {
            return;
        }
        if self.touches.is_empty() {
            self.touch_mode = Some(self.mode);
        }
        self.touches.push((id, pos));
        self.restart_touch_gesture();
    }

    fn handle_touch_move(&mut self, id: u64, pos: Vec2) -> Vec<ViewportCommand> {
        let Some(slot) = self.touches.iter_mut().find(|(t, _)| *t == id) else {
            return Vec::new();
        };
        let delta = pos - slot.1;
        slot.1 = pos;

        let mode = self.touch_mode.unwrap_or(self.mode);
        let threshold = self.drag_threshold;
        match self.touch.as_mut() {
            Some(TouchGesture::Single {
                id: active,
                travelled,
                dragging,
            }) if *active == id => {
                if !advance_drag(travelled, dragging, delta, threshold) {
                    return Vec::new();
                }
                self.drag_command(mode.primary_action(), delta)
                    .into_iter()
                    .collect()
            }
            Some(TouchGesture::Double { centroid, spread }) => {
                let Some((new_centroid, new_spread)) =
                    two_finger_frame(&self.touches)
                else {
                    return Vec::new();
                };
                let moved = new_centroid - *centroid;
                let pinched = new_spread - *spread;
                *centroid = new_centroid;
                *spread = new_spread;

                let mut commands = Vec::with_capacity(2);
                if pinched != 0.0 {
                    commands.push(ViewportCommand::Dolly {
                        delta: pinched / self.pinch_pixels_per_step,
                    });
                }
                if moved != Vec2::ZERO {
                    commands.extend(
                        self.drag_command(mode.secondary_action(), moved),
                    );
                }
                commands
            }
            _ => Vec::new(),
        }
    }

    fn handle_touch_end(&mut self, id: u64) {
        self.touches.retain(|(t, _)| *t != id);
        if self.touches.is_empty() {
            self.touch_mode = None;
        }
        self.restart_touch_gesture();
    }

    /// Re-derive the touch gesture from the fingers currently down.
    fn restart_touch_gesture(&mut self) {
        self.touch = match self.touches.as_slice() {
            [(id, _)] => Some(TouchGesture::Single {
                id: *id,
                travelled: 0.0,
                dragging: false,
            }),
            [_, _] => two_finger_frame(&self.touches)
                .map(|(centroid, spread)| TouchGesture::Double { centroid, spread }),
            _ => None,
        };
    }

    fn drag_command(
        &self,
        action: GestureAction,
        delta: Vec2,
    ) -> Option<ViewportCommand> {
        if delta == Vec2::ZERO {
            return None;
        }
        Some(match action {
            GestureAction::Rotate => ViewportCommand::Orbit { delta },
            GestureAction::Pan => ViewportCommand::Pan { delta },
            // Dragging up moves closer.
            GestureAction::Dolly => ViewportCommand::Dolly {
                delta: -delta.y / self.pinch_pixels_per_step,
            },
        })
    }
}

/// Accumulate drag travel; returns whether the drag is past the threshold.
fn advance_drag(
    travelled: &mut f32,
    dragging: &mut bool,
    delta: Vec2,
    threshold: f32,
) -> bool {
    if !*dragging {
        *travelled += delta.length();
        *dragging = *travelled > threshold;
    }
    *dragging
}

/// Centroid and finger spread of the first two touches.
fn two_finger_frame(touches: &[(u64, Vec2)]) -> Option<(Vec2, f32)> {
    match touches {
        [(_, a), (_, b), ..] => Some(((*a + *b) * 0.5, a.distance(*b))),
        _ => None,
    }
}
