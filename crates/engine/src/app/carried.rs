use thiserror::Error;

use super::geometry::{ease_sine, Vec2};
use super::inventory::BoxId;
use super::schedule::{Progress, StepOutcome};
use crate::content::ItemDefId;

/// Offset of the carried icon from the pointer, below and to the right.
pub const CARRY_POINTER_OFFSET: Vec2 = Vec2 { x: 40.0, y: -40.0 };
/// The drop animation runs for half a second.
const DROP_RATE_PER_SECOND: f32 = 2.0;

/// Snapshot of the box an item was picked from, captured at pickup time.
#[derive(Debug, Clone, PartialEq)]
pub struct HeldItem {
    pub source_box: BoxId,
    pub item: ItemDefId,
    pub display_name: String,
    pub icon: String,
    pub origin: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropAnimation {
    source_box: BoxId,
    start: Vec2,
    end: Vec2,
    progress: Progress,
}

/// `Dropping` deliberately holds no item: only the box id needed to restore
/// the box once the animation lands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CarryState {
    #[default]
    Inactive,
    Carrying(HeldItem),
    Dropping(DropAnimation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CarryError {
    #[error("already carrying an item from box {held:?}")]
    AlreadyCarrying { held: BoxId },
    #[error("carried item is still dropping back to box {source_box:?}")]
    StillDropping { source_box: BoxId },
}

/// The single "currently held item" of an inventory.
#[derive(Debug, Clone, Default)]
pub struct CarriedItem {
    state: CarryState,
    /// Icon position in inventory-local coordinates.
    position: Vec2,
}

impl CarriedItem {
    pub fn state(&self) -> &CarryState {
        &self.state
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, CarryState::Inactive)
    }

    /// True only while an item is held and not animating back.
    pub fn is_carrying(&self) -> bool {
        matches!(self.state, CarryState::Carrying(_))
    }

    pub fn is_dropping(&self) -> bool {
        matches!(self.state, CarryState::Dropping(_))
    }

    pub fn held(&self) -> Option<&HeldItem> {
        match &self.state {
            CarryState::Carrying(held) => Some(held),
            _ => None,
        }
    }

    /// The box whose icon is on screen, in either visible state. Presentation only.
    pub fn source_box(&self) -> Option<BoxId> {
        match &self.state {
            CarryState::Inactive => None,
            CarryState::Carrying(held) => Some(held.source_box),
            CarryState::Dropping(animation) => Some(animation.source_box),
        }
    }

    pub fn view(&self) -> CarryView<'_> {
        CarryView { carried: self }
    }

    pub(crate) fn activate(&mut self, held: HeldItem) -> Result<(), CarryError> {
        match &self.state {
            CarryState::Carrying(current) => {
                return Err(CarryError::AlreadyCarrying {
                    held: current.source_box,
                })
            }
            CarryState::Dropping(animation) => {
                return Err(CarryError::StillDropping {
                    source_box: animation.source_box,
                })
            }
            CarryState::Inactive => {}
        }
        self.position = held.origin;
        self.state = CarryState::Carrying(held);
        Ok(())
    }

    /// Moves the icon to follow the pointer, given in inventory-local coordinates.
    pub(crate) fn follow_pointer(&mut self, pointer_local: Vec2) {
        if self.is_carrying() {
            self.position = pointer_local.add(CARRY_POINTER_OFFSET);
        }
    }

    pub(crate) fn begin_drop(&mut self) -> bool {
        let (source_box, end) = match &self.state {
            CarryState::Carrying(held) => (held.source_box, held.origin),
            _ => return false,
        };
        self.state = CarryState::Dropping(DropAnimation {
            source_box,
            start: self.position,
            end,
            progress: Progress::new(DROP_RATE_PER_SECOND),
        });
        true
    }

    /// Advances the drop animation; returns the source box once it has landed.
    pub(crate) fn step(&mut self, dt_seconds: f32) -> Option<BoxId> {
        let CarryState::Dropping(animation) = &mut self.state else {
            return None;
        };
        let outcome = animation.progress.advance(dt_seconds);
        self.position = animation
            .start
            .lerp(animation.end, ease_sine(animation.progress.value()));
        if outcome != StepOutcome::Finished {
            return None;
        }
        let source_box = animation.source_box;
        self.position = animation.end;
        self.state = CarryState::Inactive;
        Some(source_box)
    }

    /// Keeps the held snapshot in step with its box after a runtime update.
    pub(crate) fn refresh(&mut self, source_box: BoxId, display_name: &str, icon: &str) {
        if let CarryState::Carrying(held) = &mut self.state {
            if held.source_box == source_box {
                held.display_name = display_name.to_string();
                held.icon = icon.to_string();
            }
        }
    }

    /// Ends any carry immediately, returning the box that was excluded.
    pub(crate) fn clear(&mut self) -> Option<BoxId> {
        let source_box = self.source_box();
        self.state = CarryState::Inactive;
        source_box
    }
}

/// Read-only view handed to interactables: they may ask what is held, never change it.
#[derive(Debug, Clone, Copy)]
pub struct CarryView<'a> {
    carried: &'a CarriedItem,
}

impl<'a> CarryView<'a> {
    pub fn is_carrying(&self) -> bool {
        self.carried.is_carrying()
    }

    pub fn is_dropping(&self) -> bool {
        self.carried.is_dropping()
    }

    pub fn peek(&self) -> Option<&'a HeldItem> {
        self.carried.held()
    }

    /// The "Use X with ..." prompt shown above the inventory while carrying.
    pub fn prompt(&self, target: Option<&str>) -> Option<String> {
        self.peek()
            .map(|held| format!("Use {} with {}", held.display_name, target.unwrap_or("...")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(box_index: u64) -> HeldItem {
        HeldItem {
            source_box: BoxId(box_index),
            item: ItemDefId(box_index as u32),
            display_name: format!("item {box_index}"),
            icon: "icon".to_string(),
            origin: Vec2::new(-595.0, 0.0),
        }
    }

    #[test]
    fn second_activation_is_rejected_while_carrying() {
        let mut carried = CarriedItem::default();
        carried.activate(held(1)).expect("first activation");
        let err = carried.activate(held(2)).expect_err("second activation");
        assert_eq!(err, CarryError::AlreadyCarrying { held: BoxId(1) });
        assert_eq!(carried.held().map(|h| h.source_box), Some(BoxId(1)));
    }

    #[test]
    fn dropping_exposes_nothing_held() {
        let mut carried = CarriedItem::default();
        carried.activate(held(1)).expect("activate");
        assert!(carried.begin_drop());
        assert!(carried.is_dropping());
        assert!(!carried.is_carrying());
        assert!(carried.held().is_none());
        assert!(carried.view().peek().is_none());
        assert!(carried.view().prompt(Some("door")).is_none());
    }

    #[test]
    fn drop_lands_on_origin_after_half_a_second() {
        let mut carried = CarriedItem::default();
        carried.activate(held(4)).expect("activate");
        carried.follow_pointer(Vec2::new(100.0, 100.0));
        assert_eq!(carried.position(), Vec2::new(140.0, 60.0));
        carried.begin_drop();

        let mut landed = None;
        for _ in 0..40 {
            landed = carried.step(1.0 / 60.0);
            if landed.is_some() {
                break;
            }
        }
        assert_eq!(landed, Some(BoxId(4)));
        assert_eq!(carried.position(), Vec2::new(-595.0, 0.0));
        assert_eq!(carried.state(), &CarryState::Inactive);
    }

    #[test]
    fn pointer_is_ignored_while_dropping() {
        let mut carried = CarriedItem::default();
        carried.activate(held(1)).expect("activate");
        carried.begin_drop();
        let before = carried.position();
        carried.follow_pointer(Vec2::new(500.0, 500.0));
        assert_eq!(carried.position(), before);
    }

    #[test]
    fn prompt_names_target_or_ellipsis() {
        let mut carried = CarriedItem::default();
        carried.activate(held(2)).expect("activate");
        let view = carried.view();
        assert_eq!(view.prompt(None).as_deref(), Some("Use item 2 with ..."));
        assert_eq!(
            view.prompt(Some("door")).as_deref(),
            Some("Use item 2 with door")
        );
    }

    #[test]
    fn clear_returns_source_box_from_any_active_state() {
        let mut carried = CarriedItem::default();
        assert_eq!(carried.clear(), None);
        carried.activate(held(3)).expect("activate");
        carried.begin_drop();
        assert_eq!(carried.clear(), Some(BoxId(3)));
        assert!(!carried.is_visible());
    }
}
