use serde::{Deserialize, Serialize};

use super::event::MouseButton;

/// Which drag action the primary pointer button and one-finger touch
/// perform.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Primary drags orbit; secondary drags pan.
    #[default]
    Rotate,
    /// Primary drags pan; secondary drags orbit.
    Pan,
}

/// What a drag does to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureAction {
    /// Orbit around the target.
    Rotate,
    /// Slide the target in the view plane.
    Pan,
    /// Move toward / away from the target.
    Dolly,
}

impl InteractionMode {
    /// Mode selected by the host's `pan_mode` flag.
    #[must_use]
    pub fn from_pan_mode(pan_mode: bool) -> Self {
        if pan_mode {
            Self::Pan
        } else {
            Self::Rotate
        }
    }

    /// Whether this is the pan-primary mode.
    #[must_use]
    pub fn is_pan(self) -> bool {
        self == Self::Pan
    }

    /// Action for the primary button and one-finger touch.
    #[must_use]
    pub fn primary_action(self) -> GestureAction {
        match self {
            Self::Rotate => GestureAction::Rotate,
            Self::Pan => GestureAction::Pan,
        }
    }

    /// Action for the secondary button and two-finger movement.
    #[must_use]
    pub fn secondary_action(self) -> GestureAction {
        match self {
            Self::Rotate => GestureAction::Pan,
            Self::Pan => GestureAction::Rotate,
        }
    }

    /// Drag action for a mouse button. The middle button always dollies.
    #[must_use]
    pub fn action_for_button(self, button: MouseButton) -> GestureAction {
        match button {
            MouseButton::Left => self.primary_action(),
            MouseButton::Right => self.secondary_action(),
            MouseButton::Middle => GestureAction::Dolly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_mode_swaps_primary_and_secondary() {
        let rotate = InteractionMode::from_pan_mode(false);
        let pan = InteractionMode::from_pan_mode(true);
        assert_eq!(rotate.primary_action(), GestureAction::Rotate);
        assert_eq!(rotate.secondary_action(), GestureAction::Pan);
        assert_eq!(pan.primary_action(), GestureAction::Pan);
        assert_eq!(pan.secondary_action(), GestureAction::Rotate);
    }

    #[test]
    fn middle_button_dollies_in_both_modes() {
        for mode in [InteractionMode::Rotate, InteractionMode::Pan] {
            assert_eq!(
                mode.action_for_button(MouseButton::Middle),
                GestureAction::Dolly
            );
        }
    }
}
