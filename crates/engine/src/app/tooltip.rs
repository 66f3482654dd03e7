use super::geometry::{ScreenSize, Vec2};
use super::schedule::Tick;

/// Pointer positions within this many pixels of the top edge flip label pivots downward.
const TOP_EDGE_BAND_PX: f32 = 40.0;
const HOVER_PIVOT_Y_DEFAULT: f32 = 0.0;
const HOVER_PIVOT_Y_NEAR_TOP: f32 = 3.5;
const HINT_PIVOT_Y_DEFAULT: f32 = 0.5;
const HINT_PIVOT_Y_NEAR_TOP: f32 = 1.0;

pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverTooltip {
    pub text: String,
    pub anchor: Vec2,
    pub pivot: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HintLabel {
    pub text: String,
    pub anchor: Vec2,
    pub pivot: Vec2,
}

/// Floating hover tooltip, the description panel, the hint overlay, and the
/// one-line prompt above the inventory.
#[derive(Debug, Clone, Default)]
pub struct TooltipFeedback {
    screen: ScreenSize,
    pointer: Vec2,
    hover: Option<HoverTooltip>,
    description: Option<String>,
    description_activated: Option<Tick>,
    hints: Vec<HintLabel>,
    inventory_line: String,
}

impl TooltipFeedback {
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            screen,
            ..Self::default()
        }
    }

    pub fn set_screen(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    pub fn hover(&self) -> Option<&HoverTooltip> {
        self.hover.as_ref()
    }

    pub fn activate_tooltip(&mut self, text: &str) {
        let anchor = self.pointer;
        self.hover = Some(HoverTooltip {
            text: text.to_string(),
            anchor,
            pivot: self.hover_pivot(anchor),
        });
    }

    pub fn deactivate_tooltip(&mut self) {
        self.hover = None;
    }

    /// Keeps the hover tooltip under the pointer, given in stage coordinates.
    pub fn follow_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
        let pivot = self.hover_pivot(pointer);
        if let Some(hover) = self.hover.as_mut() {
            hover.anchor = pointer;
            hover.pivot = pivot;
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_description_active(&self) -> bool {
        self.description.is_some()
    }

    /// Shows `text` in the description panel, replacing any current text.
    /// Blank text is ignored.
    pub fn activate_description(&mut self, text: &str, now: Tick) -> bool {
        if is_blank(text) {
            return false;
        }
        self.description_activated = Some(now);
        self.description = Some(text.to_string());
        true
    }

    /// Hides the description unless it was activated during tick `now`.
    pub fn deactivate_description(&mut self, now: Tick) -> bool {
        if self.description.is_none() || self.description_activated == Some(now) {
            return false;
        }
        self.description = None;
        true
    }

    pub fn hints(&self) -> &[HintLabel] {
        &self.hints
    }

    /// Shows one label per non-blank candidate, or removes the hints if they
    /// are already showing. Returns whether hints are visible afterwards.
    pub fn toggle_hints<'a, I>(&mut self, candidates: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, Vec2)>,
    {
        if !self.hints.is_empty() {
            self.deactivate_hints();
            return false;
        }

        let screen = self.screen;
        self.hints = candidates
            .into_iter()
            .filter(|(text, _)| !is_blank(text))
            .map(|(text, anchor)| HintLabel {
                text: text.to_string(),
                anchor,
                pivot: hint_pivot(anchor, screen),
            })
            .collect();
        !self.hints.is_empty()
    }

    pub fn deactivate_hints(&mut self) {
        self.hints.clear();
    }

    pub fn inventory_line(&self) -> &str {
        &self.inventory_line
    }

    pub fn set_inventory_line(&mut self, text: impl Into<String>) {
        self.inventory_line = text.into();
    }

    fn hover_pivot(&self, pointer: Vec2) -> Vec2 {
        let width = self.screen.width.max(1) as f32;
        let height = self.screen.height as f32;
        let from_left = pointer.x + width * 0.5;
        let from_bottom = pointer.y + height * 0.5;
        let x = ((2.0 * from_left / width) - 1.0).powi(3) / 2.0 + 0.5;
        let y = if from_bottom > height - TOP_EDGE_BAND_PX {
            HOVER_PIVOT_Y_NEAR_TOP
        } else {
            HOVER_PIVOT_Y_DEFAULT
        };
        Vec2::new(x, y)
    }
}

fn hint_pivot(anchor: Vec2, screen: ScreenSize) -> Vec2 {
    let width = screen.width.max(1) as f32;
    let height = screen.height as f32;
    let x = (2.0 * anchor.x / width).powi(3) / 2.0 + 0.5;
    let y = if anchor.y + height * 0.5 > height - TOP_EDGE_BAND_PX {
        HINT_PIVOT_Y_NEAR_TOP
    } else {
        HINT_PIVOT_Y_DEFAULT
    };
    Vec2::new(x, y)
}
