use super::geometry::{ScreenSize, Vec2};

/// Pointer-driven actions, reported as press edges for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Primary,
    Secondary,
    /// Middle button or space bar: toggles the hint overlay.
    Hint,
    Quit,
}

const ACTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, pressed: bool) {
        self.pressed[action.index()] = pressed;
    }

    pub(crate) fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }

    fn union(self, other: ActionStates) -> ActionStates {
        let mut pressed = self.pressed;
        for (slot, other) in pressed.iter_mut().zip(other.pressed) {
            *slot |= other;
        }
        ActionStates { pressed }
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::Primary => 0,
            InputAction::Secondary => 1,
            InputAction::Hint => 2,
            InputAction::Quit => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
    window_size: Option<ScreenSize>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_pressed(mut self, action: InputAction, pressed: bool) -> Self {
        self.actions.set(action, pressed);
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_window_size(mut self, window_size: ScreenSize) -> Self {
        self.window_size = Some(window_size);
        self
    }

    pub fn pressed(&self, action: InputAction) -> bool {
        self.actions.is_pressed(action)
    }

    pub fn primary_pressed(&self) -> bool {
        self.pressed(InputAction::Primary)
    }

    pub fn secondary_pressed(&self) -> bool {
        self.pressed(InputAction::Secondary)
    }

    pub fn hint_pressed(&self) -> bool {
        self.pressed(InputAction::Hint)
    }

    pub fn quit_requested(&self) -> bool {
        self.pressed(InputAction::Quit)
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn window_size(&self) -> Option<ScreenSize> {
        self.window_size
    }

    /// Keeps this snapshot's pointer and window, adding any press edges from
    /// `earlier` that no tick has consumed yet.
    pub fn with_presses_from(mut self, earlier: &InputSnapshot) -> Self {
        self.actions = self.actions.union(earlier.actions);
        self
    }

    /// Same pointer position and window, with every press edge cleared.
    pub fn without_presses(&self) -> Self {
        Self {
            actions: ActionStates::default(),
            ..*self
        }
    }
}
