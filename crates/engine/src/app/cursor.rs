use serde::{Deserialize, Serialize};
use tracing::warn;

use super::geometry::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorName {
    #[default]
    Main,
    Look,
    Use,
    Pickup,
    NavigateUp,
    CarryItem,
    Inventory,
}

impl CursorName {
    pub fn hotspot(self) -> Vec2 {
        match self {
            CursorName::NavigateUp => Vec2::new(16.0, 0.0),
            _ => Vec2::ZERO,
        }
    }
}

/// Semantic cursor state with a one-level suppression override while an item
/// is carried. Requests made under suppression are buffered and applied when
/// the carry ends.
#[derive(Debug, Clone, Default)]
pub struct CursorFeedback {
    presented: CursorName,
    suppressed: bool,
    pending_under_suppression: CursorName,
}

impl CursorFeedback {
    pub fn presented(&self) -> CursorName {
        self.presented
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn pending(&self) -> CursorName {
        self.pending_under_suppression
    }

    pub fn change(&mut self, cursor: CursorName) {
        if cursor == CursorName::CarryItem {
            warn!("carry cursor requested through change; use set_carrying");
            self.set_carrying(true);
            return;
        }

        if self.suppressed {
            self.pending_under_suppression = cursor;
        } else {
            self.presented = cursor;
        }
    }

    pub fn set_carrying(&mut self, carrying: bool) {
        self.suppressed = carrying;
        if carrying {
            self.presented = CursorName::CarryItem;
            self.pending_under_suppression = CursorName::Main;
        } else {
            self.presented = self.pending_under_suppression;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_apply_immediately_when_not_carrying() {
        let mut cursor = CursorFeedback::default();
        cursor.change(CursorName::Look);
        assert_eq!(cursor.presented(), CursorName::Look);
    }

    #[test]
    fn changes_under_suppression_are_applied_when_carry_ends() {
        let mut cursor = CursorFeedback::default();
        cursor.set_carrying(true);
        cursor.change(CursorName::Use);
        cursor.change(CursorName::NavigateUp);
        assert_eq!(cursor.presented(), CursorName::CarryItem);

        cursor.set_carrying(false);
        assert_eq!(cursor.presented(), CursorName::NavigateUp);
        assert!(!cursor.is_suppressed());
    }

    #[test]
    fn carrying_resets_pending_to_main() {
        let mut cursor = CursorFeedback::default();
        cursor.change(CursorName::Look);
        cursor.set_carrying(true);
        cursor.set_carrying(false);
        assert_eq!(cursor.presented(), CursorName::Main);
    }

    #[test]
    fn requesting_carry_cursor_routes_to_carry_path() {
        let mut cursor = CursorFeedback::default();
        cursor.change(CursorName::CarryItem);
        assert!(cursor.is_suppressed());
        assert_eq!(cursor.presented(), CursorName::CarryItem);
    }

    #[test]
    fn navigate_cursor_has_offset_hotspot() {
        assert_eq!(CursorName::NavigateUp.hotspot(), Vec2::new(16.0, 0.0));
        assert_eq!(CursorName::Look.hotspot(), Vec2::ZERO);
    }
}
