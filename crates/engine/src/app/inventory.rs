use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, info};

use super::carried::{CarriedItem, CarryError, CarryView, HeldItem};
use super::cursor::{CursorFeedback, CursorName};
use super::gate::{GateHold, InputGate};
use super::geometry::{ease_sine, Rect, Vec2};
use super::schedule::{Progress, StepOutcome};
use super::tooltip::TooltipFeedback;
use crate::content::{ItemDef, ItemDefId};

// Layout constants are for a 1280x720 stage with centered pivots.
pub const BOX_SIZE: f32 = 80.0;
pub const BOX_SPACING: f32 = 3.0;
pub const FIRST_BOX_X: f32 = -595.0;
/// Vertical offset of the inventory panel from the stage origin.
pub const PANEL_OFFSET_Y: f32 = -315.0;
pub const PANEL_HEIGHT: f32 = 90.0;

const FLY_RATE_PER_SECOND: f32 = 1.5;
const SHUFFLE_STAGGER_SECONDS: f32 = 0.1;
const SHUFFLE_GRACE_SECONDS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub u64);

/// Inventory-local position of slot `index`. Pure function of the index.
pub fn slot_position(index: usize) -> Vec2 {
    Vec2::new(FIRST_BOX_X + (BOX_SIZE + BOX_SPACING) * index as f32, 0.0)
}

pub fn local_to_stage(local: Vec2) -> Vec2 {
    local.add(Vec2::new(0.0, PANEL_OFFSET_Y))
}

pub fn stage_to_local(stage: Vec2) -> Vec2 {
    stage.sub(Vec2::new(0.0, PANEL_OFFSET_Y))
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("inventory box {0:?} does not exist")]
    UnknownBox(BoxId),
    #[error("item {item:?} is not in an inventory box")]
    NotInInventory { item: ItemDefId },
    #[error("inventory box {0:?} is not available to pick up")]
    BoxUnavailable(BoxId),
    #[error(transparent)]
    Carry(#[from] CarryError),
}

/// Runtime change to a picked-up item. `None` fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryBox {
    id: BoxId,
    item: ItemDefId,
    display_name: String,
    description: String,
    icon: String,
    position: Vec2,
    active: bool,
    highlighted: bool,
    parked: bool,
}

impl InventoryBox {
    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn item(&self) -> ItemDefId {
        self.item
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Current inventory-local position, mid-animation included.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// False while the box is flying in or while its item is carried.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// True while the box waits hidden behind earlier inventory animations.
    pub fn is_parked(&self) -> bool {
        self.parked
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, BOX_SIZE, BOX_SIZE)
    }
}

#[derive(Debug, Clone)]
struct SlotTween {
    box_id: BoxId,
    start: Vec2,
    progress: Progress,
}

impl SlotTween {
    fn new(box_id: BoxId, start: Vec2) -> Self {
        Self {
            box_id,
            start,
            progress: Progress::new(FLY_RATE_PER_SECOND),
        }
    }

    /// Moves the box toward its current slot. Finishes early if the box is gone.
    fn step(&mut self, items: &mut [InventoryBox], dt_seconds: f32) -> StepOutcome {
        let Some(index) = items.iter().position(|item| item.id == self.box_id) else {
            return StepOutcome::Finished;
        };
        let outcome = self.progress.advance(dt_seconds);
        let end = slot_position(index);
        let entry = &mut items[index];
        entry.position = if outcome.is_finished() {
            end
        } else {
            self.start.lerp(end, ease_sine(self.progress.value()))
        };
        outcome
    }
}

#[derive(Debug, Clone)]
struct ShuffleProcess {
    elapsed: f32,
    launched: usize,
    total: usize,
    tweens: Vec<SlotTween>,
}

impl ShuffleProcess {
    fn step(&mut self, items: &mut [InventoryBox], dt_seconds: f32) -> StepOutcome {
        while self.launched < self.total
            && self.elapsed >= self.launched as f32 * SHUFFLE_STAGGER_SECONDS
        {
            let index = self.launched;
            if let Some(entry) = items.get(index) {
                if !entry.parked && entry.position != slot_position(index) {
                    self.tweens.push(SlotTween::new(entry.id, entry.position));
                }
            }
            self.launched += 1;
        }

        self.tweens
            .retain_mut(|tween| !tween.step(items, dt_seconds).is_finished());
        self.elapsed += dt_seconds.max(0.0);

        let settled =
            self.elapsed >= self.total as f32 * SHUFFLE_STAGGER_SECONDS + SHUFFLE_GRACE_SECONDS;
        if self.launched >= self.total && self.tweens.is_empty() && settled {
            StepOutcome::Finished
        } else {
            StepOutcome::Running
        }
    }
}

#[derive(Debug, Clone)]
enum Choreography {
    Pickup(SlotTween),
    Shuffle(ShuffleProcess),
}

impl Choreography {
    fn hold(&self) -> GateHold {
        match self {
            Choreography::Pickup(_) => GateHold::Pickup,
            Choreography::Shuffle(_) => GateHold::Shuffle,
        }
    }
}

/// Picked-up items, their packed layout and the single carried item.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    scene_name: String,
    items: Vec<InventoryBox>,
    carried: CarriedItem,
    open: bool,
    initialized: bool,
    next_box_id: u64,
    choreography: VecDeque<Choreography>,
}

impl Inventory {
    pub fn new(scene_name: impl Into<String>) -> Self {
        Self {
            scene_name: scene_name.into(),
            ..Self::default()
        }
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    /// Resets to an empty, closed inventory with nothing carried.
    pub fn initialize(&mut self, tooltip: &mut TooltipFeedback) {
        self.items.clear();
        self.choreography.clear();
        self.carried = CarriedItem::default();
        self.open = false;
        tooltip.set_inventory_line("");
        self.initialized = true;
        info!(scene = %self.scene_name, "inventory_initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn items(&self) -> &[InventoryBox] {
        &self.items
    }

    pub fn item_box(&self, id: BoxId) -> Option<&InventoryBox> {
        self.items.iter().find(|entry| entry.id == id)
    }

    pub fn carried(&self) -> &CarriedItem {
        &self.carried
    }

    pub fn carry_view(&self) -> CarryView<'_> {
        self.carried.view()
    }

    pub fn contains_item(&self, item: ItemDefId) -> bool {
        self.box_for_item(item).is_some()
    }

    pub fn box_for_item(&self, item: ItemDefId) -> Option<BoxId> {
        self.items
            .iter()
            .find(|entry| entry.item == item)
            .map(|entry| entry.id)
    }

    /// Where box `id` belongs once all animations settle.
    pub fn target_position(&self, id: BoxId) -> Option<Vec2> {
        self.index_of(id).map(slot_position)
    }

    /// Adds a box for `def`, flying in from `start_local`. The box becomes
    /// active when its pickup animation lands.
    pub fn add_item(
        &mut self,
        item: ItemDefId,
        def: &ItemDef,
        start_local: Vec2,
        gate: &mut InputGate,
    ) -> BoxId {
        let id = BoxId(self.next_box_id);
        self.next_box_id = self.next_box_id.saturating_add(1);
        let parked = !self.choreography.is_empty();
        self.items.push(InventoryBox {
            id,
            item,
            display_name: def.display_name.clone(),
            description: def.description.clone(),
            icon: def.icon.clone(),
            position: start_local,
            active: false,
            highlighted: false,
            parked,
        });
        self.enqueue(Choreography::Pickup(SlotTween::new(id, start_local)), gate);
        info!(item = %def.name, slot = self.items.len() - 1, "inventory_item_added");
        id
    }

    /// Removes box `id`, clearing any carry, and shuffles the rest into place.
    pub fn remove_item(
        &mut self,
        id: BoxId,
        gate: &mut InputGate,
        cursor: &mut CursorFeedback,
        tooltip: &mut TooltipFeedback,
    ) -> Result<(), InventoryError> {
        let index = self.index_of(id).ok_or(InventoryError::UnknownBox(id))?;
        self.end_carry(gate, cursor, tooltip);
        let removed = self.items.remove(index);
        self.choreography.retain(|process| match process {
            Choreography::Pickup(tween) => tween.box_id != id,
            Choreography::Shuffle(_) => true,
        });
        if !self.choreography.iter().any(|p| p.hold() == GateHold::Pickup) {
            gate.release(GateHold::Pickup);
        }
        let total = self.items.len();
        self.enqueue(
            Choreography::Shuffle(ShuffleProcess {
                elapsed: 0.0,
                launched: 0,
                total,
                tweens: Vec::new(),
            }),
            gate,
        );
        info!(item = %removed.display_name, remaining = total, "inventory_item_removed");
        Ok(())
    }

    /// Picks box `id` up as the carried item. The box stays in the sequence
    /// but is excluded until the carry ends.
    pub fn pick_up(
        &mut self,
        id: BoxId,
        cursor: &mut CursorFeedback,
        tooltip: &mut TooltipFeedback,
    ) -> Result<(), InventoryError> {
        let index = self.index_of(id).ok_or(InventoryError::UnknownBox(id))?;
        if !self.items[index].active {
            return Err(InventoryError::BoxUnavailable(id));
        }
        let entry = &self.items[index];
        self.carried.activate(HeldItem {
            source_box: id,
            item: entry.item,
            display_name: entry.display_name.clone(),
            icon: entry.icon.clone(),
            origin: entry.position,
        })?;

        let entry = &mut self.items[index];
        entry.active = false;
        entry.highlighted = false;
        cursor.set_carrying(true);
        if let Some(prompt) = self.carried.view().prompt(None) {
            tooltip.set_inventory_line(prompt);
        }
        debug!(box_id = id.0, "inventory_item_picked_up");
        Ok(())
    }

    /// Starts the carried item's drop animation. Returns false when nothing is carried.
    pub fn drop_carried(&mut self, gate: &mut InputGate, tooltip: &mut TooltipFeedback) -> bool {
        if !self.carried.is_carrying() {
            return false;
        }
        gate.close(GateHold::Drop);
        tooltip.set_inventory_line("");
        self.carried.begin_drop()
    }

    pub fn follow_pointer(&mut self, pointer_stage: Vec2) {
        self.carried.follow_pointer(stage_to_local(pointer_stage));
    }

    /// Advances the drop animation and the front choreography process.
    pub fn step(
        &mut self,
        dt_seconds: f32,
        gate: &mut InputGate,
        cursor: &mut CursorFeedback,
        tooltip: &mut TooltipFeedback,
    ) {
        if let Some(source_box) = self.carried.step(dt_seconds) {
            self.restore_box(source_box);
            cursor.set_carrying(false);
            tooltip.set_inventory_line("");
            gate.release(GateHold::Drop);
            debug!(box_id = source_box.0, "carried_item_dropped");
        }

        let Some(front) = self.choreography.front_mut() else {
            return;
        };
        let outcome = match front {
            Choreography::Pickup(tween) => {
                if let Some(entry) = self.items.iter_mut().find(|entry| entry.id == tween.box_id) {
                    entry.parked = false;
                }
                let outcome = tween.step(&mut self.items, dt_seconds);
                if outcome.is_finished() {
                    let box_id = tween.box_id;
                    if let Some(entry) = self.items.iter_mut().find(|entry| entry.id == box_id) {
                        entry.active = true;
                    }
                }
                outcome
            }
            Choreography::Shuffle(shuffle) => shuffle.step(&mut self.items, dt_seconds),
        };
        if !outcome.is_finished() {
            return;
        }
        if let Some(finished) = self.choreography.pop_front() {
            let hold = finished.hold();
            if !self.choreography.iter().any(|process| process.hold() == hold) {
                gate.release(hold);
            }
        }
    }

    pub fn panel_contains(&self, pointer_stage: Vec2, screen_width: u32) -> bool {
        self.open
            && Rect::from_center_size(
                Vec2::new(0.0, PANEL_OFFSET_Y),
                screen_width as f32,
                PANEL_HEIGHT,
            )
            .contains(pointer_stage)
    }

    /// Topmost active box under the pointer.
    pub fn box_at(&self, pointer_stage: Vec2) -> Option<BoxId> {
        if !self.open {
            return None;
        }
        let local = stage_to_local(pointer_stage);
        self.items
            .iter()
            .rev()
            .find(|entry| entry.active && entry.bounds().contains(local))
            .map(|entry| entry.id)
    }

    pub fn hover_enter(&mut self, id: BoxId, tooltip: &mut TooltipFeedback) {
        let carried = &self.carried;
        let Some(entry) = self.items.iter_mut().find(|entry| entry.id == id) else {
            return;
        };
        if !entry.active {
            return;
        }
        entry.highlighted = true;
        match carried.view().prompt(Some(entry.display_name.as_str())) {
            Some(prompt) => tooltip.set_inventory_line(prompt),
            None => tooltip.set_inventory_line(entry.display_name.clone()),
        }
    }

    pub fn hover_exit(&mut self, id: BoxId, tooltip: &mut TooltipFeedback) {
        let carried = &self.carried;
        let Some(entry) = self.items.iter_mut().find(|entry| entry.id == id) else {
            return;
        };
        if !entry.active {
            return;
        }
        entry.highlighted = false;
        match carried.view().prompt(None) {
            Some(prompt) => tooltip.set_inventory_line(prompt),
            None => tooltip.set_inventory_line(""),
        }
    }

    /// Right click on a box while nothing is carried shows its description.
    pub fn inspect(&self, id: BoxId, tooltip: &mut TooltipFeedback) {
        if self.carried.is_carrying() {
            return;
        }
        if let Some(entry) = self.item_box(id).filter(|entry| entry.active) {
            tooltip.set_inventory_line(entry.description.clone());
        }
    }

    /// Renames, redescribes or swaps the icon of `item`'s box, carried or not.
    pub fn update_item(
        &mut self,
        item: ItemDefId,
        update: ItemUpdate,
    ) -> Result<(), InventoryError> {
        let entry = self
            .items
            .iter_mut()
            .find(|entry| entry.item == item)
            .ok_or(InventoryError::NotInInventory { item })?;
        if let Some(display_name) = update.display_name {
            entry.display_name = display_name;
        }
        if let Some(description) = update.description {
            entry.description = description;
        }
        if let Some(icon) = update.icon {
            debug!(item = item.0, from = %entry.icon, to = %icon, "inventory_icon_changed");
            entry.icon = icon;
        }
        self.carried.refresh(entry.id, &entry.display_name, &entry.icon);
        Ok(())
    }

    /// Entering or leaving the panel resets the cursor.
    pub(crate) fn cursor_on_panel(&self, cursor: &mut CursorFeedback) {
        cursor.change(CursorName::Main);
    }

    fn end_carry(
        &mut self,
        gate: &mut InputGate,
        cursor: &mut CursorFeedback,
        tooltip: &mut TooltipFeedback,
    ) {
        let was_dropping = self.carried.is_dropping();
        if let Some(source_box) = self.carried.clear() {
            self.restore_box(source_box);
            cursor.set_carrying(false);
        }
        if was_dropping {
            gate.release(GateHold::Drop);
        }
        tooltip.set_inventory_line("");
    }

    fn restore_box(&mut self, id: BoxId) {
        if let Some(entry) = self.items.iter_mut().find(|entry| entry.id == id) {
            entry.active = true;
        }
    }

    fn enqueue(&mut self, process: Choreography, gate: &mut InputGate) {
        let hold = process.hold();
        if !self.choreography.iter().any(|queued| queued.hold() == hold) {
            gate.close(hold);
        }
        self.choreography.push_back(process);
    }

    fn index_of(&self, id: BoxId) -> Option<usize> {
        self.items.iter().position(|entry| entry.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn item_def(name: &str) -> ItemDef {
        ItemDef {
            name: name.to_string(),
            display_name: name.to_uppercase(),
            description: format!("a {name}"),
            icon: format!("{name}.png"),
        }
    }

    struct Rig {
        inventory: Inventory,
        gate: InputGate,
        cursor: CursorFeedback,
        tooltip: TooltipFeedback,
    }

    impl Rig {
        fn new() -> Self {
            let mut tooltip = TooltipFeedback::default();
            let mut inventory = Inventory::new("inventory");
            inventory.initialize(&mut tooltip);
            inventory.set_open(true);
            Self {
                inventory,
                gate: InputGate::default(),
                cursor: CursorFeedback::default(),
                tooltip,
            }
        }

        fn add(&mut self, name: &str, item: u32) -> BoxId {
            self.inventory.add_item(
                ItemDefId(item),
                &item_def(name),
                Vec2::new(200.0, 300.0),
                &mut self.gate,
            )
        }

        fn step(&mut self) {
            self.inventory
                .step(DT, &mut self.gate, &mut self.cursor, &mut self.tooltip);
        }

        fn settle(&mut self) -> usize {
            let mut ticks = 0;
            while !self.gate.is_open() {
                self.step();
                ticks += 1;
                assert!(ticks < 600, "inventory never reopened the gate");
            }
            ticks
        }
    }

    #[test]
    fn slot_positions_are_packed_left_to_right() {
        assert_eq!(slot_position(0), Vec2::new(-595.0, 0.0));
        assert_eq!(slot_position(2), Vec2::new(-595.0 + 166.0, 0.0));
    }

    #[test]
    fn pickup_flies_to_slot_then_activates_and_reopens_gate() {
        let mut rig = Rig::new();
        let id = rig.add("key", 0);
        assert!(!rig.gate.is_open());
        assert!(!rig.inventory.item_box(id).expect("box").is_active());

        let ticks = rig.settle();
        assert!(ticks <= 45, "pickup took {ticks} ticks");
        let entry = rig.inventory.item_box(id).expect("box");
        assert!(entry.is_active());
        assert_eq!(entry.position(), slot_position(0));
    }

    #[test]
    fn queued_pickups_hold_the_gate_until_the_last_lands() {
        let mut rig = Rig::new();
        let first = rig.add("key", 0);
        let second = rig.add("rope", 1);

        let mut first_landed_with_gate_closed = false;
        for _ in 0..600 {
            rig.step();
            let first_active = rig.inventory.item_box(first).expect("first").is_active();
            let second_active = rig.inventory.item_box(second).expect("second").is_active();
            if first_active && !second_active {
                first_landed_with_gate_closed |= !rig.gate.is_open();
            }
            if rig.gate.is_open() {
                break;
            }
        }
        assert!(first_landed_with_gate_closed);
        assert!(rig.gate.is_open());
        assert_eq!(
            rig.inventory.item_box(second).expect("second").position(),
            slot_position(1)
        );
    }

    #[test]
    fn removal_shuffles_remaining_boxes_without_gaps() {
        let mut rig = Rig::new();
        let ids: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(index, name)| rig.add(name, index as u32))
            .collect();
        rig.settle();

        rig.inventory
            .remove_item(ids[1], &mut rig.gate, &mut rig.cursor, &mut rig.tooltip)
            .expect("remove");
        assert!(rig.gate.is_held_by(GateHold::Shuffle));

        let remaining = [ids[0], ids[2], ids[3]];
        for (new_index, id) in remaining.iter().enumerate() {
            assert_eq!(
                rig.inventory.target_position(*id),
                Some(slot_position(new_index))
            );
        }

        let ticks = rig.settle();
        // Three boxes staggered by 0.1s plus the 0.5s grace period.
        assert!(ticks >= 48, "shuffle reopened the gate after {ticks} ticks");
        for (new_index, id) in remaining.iter().enumerate() {
            let entry = rig.inventory.item_box(*id).expect("box");
            assert_eq!(entry.position(), slot_position(new_index));
        }
    }

    #[test]
    fn picking_up_excludes_only_the_source_box() {
        let mut rig = Rig::new();
        let a = rig.add("a", 0);
        let b = rig.add("b", 1);
        rig.settle();

        rig.inventory
            .pick_up(a, &mut rig.cursor, &mut rig.tooltip)
            .expect("pick up a");
        let err = rig
            .inventory
            .pick_up(b, &mut rig.cursor, &mut rig.tooltip)
            .expect_err("b rejected");
        assert!(matches!(
            err,
            InventoryError::Carry(CarryError::AlreadyCarrying { held }) if held == a
        ));

        assert!(!rig.inventory.item_box(a).expect("a").is_active());
        assert!(rig.inventory.item_box(b).expect("b").is_active());
        assert_eq!(rig.cursor.presented(), CursorName::CarryItem);
        assert_eq!(rig.tooltip.inventory_line(), "Use A with ...");
    }

    #[test]
    fn drop_restores_box_cursor_and_gate() {
        let mut rig = Rig::new();
        let a = rig.add("a", 0);
        rig.settle();
        rig.inventory
            .pick_up(a, &mut rig.cursor, &mut rig.tooltip)
            .expect("pick up");
        rig.cursor.change(CursorName::Look);

        assert!(rig.inventory.drop_carried(&mut rig.gate, &mut rig.tooltip));
        assert!(rig.gate.is_held_by(GateHold::Drop));
        assert_eq!(rig.tooltip.inventory_line(), "");
        assert!(rig.inventory.carry_view().peek().is_none());

        let ticks = rig.settle();
        assert!(ticks <= 31, "drop took {ticks} ticks");
        assert!(rig.inventory.item_box(a).expect("a").is_active());
        assert_eq!(rig.cursor.presented(), CursorName::Look);
        assert!(!rig.inventory.carried().is_visible());
    }

    #[test]
    fn removing_the_carried_item_clears_carry_and_drop_hold() {
        let mut rig = Rig::new();
        let a = rig.add("a", 0);
        let b = rig.add("b", 1);
        rig.settle();
        rig.inventory
            .pick_up(a, &mut rig.cursor, &mut rig.tooltip)
            .expect("pick up");
        rig.inventory.drop_carried(&mut rig.gate, &mut rig.tooltip);

        rig.inventory
            .remove_item(a, &mut rig.gate, &mut rig.cursor, &mut rig.tooltip)
            .expect("remove");
        assert!(!rig.gate.is_held_by(GateHold::Drop));
        assert!(!rig.inventory.carried().is_visible());
        assert_eq!(rig.cursor.presented(), CursorName::Main);

        rig.settle();
        assert_eq!(rig.inventory.items().len(), 1);
        assert_eq!(
            rig.inventory.item_box(b).expect("b").position(),
            slot_position(0)
        );
    }

    #[test]
    fn hover_and_inspect_drive_the_inventory_line() {
        let mut rig = Rig::new();
        let a = rig.add("lamp", 0);
        rig.settle();

        rig.inventory.hover_enter(a, &mut rig.tooltip);
        assert_eq!(rig.tooltip.inventory_line(), "LAMP");
        assert!(rig.inventory.item_box(a).expect("a").is_highlighted());

        rig.inventory.inspect(a, &mut rig.tooltip);
        assert_eq!(rig.tooltip.inventory_line(), "a lamp");

        rig.inventory.hover_exit(a, &mut rig.tooltip);
        assert_eq!(rig.tooltip.inventory_line(), "");
        assert!(!rig.inventory.item_box(a).expect("a").is_highlighted());
    }

    #[test]
    fn box_hit_test_requires_open_panel_and_active_box() {
        let mut rig = Rig::new();
        let a = rig.add("a", 0);
        let over_slot = local_to_stage(slot_position(0));
        assert_eq!(rig.inventory.box_at(over_slot), None);

        rig.settle();
        assert_eq!(rig.inventory.box_at(over_slot), Some(a));

        rig.inventory.set_open(false);
        assert_eq!(rig.inventory.box_at(over_slot), None);
    }

    #[test]
    fn update_item_requires_item_in_inventory() {
        let mut rig = Rig::new();
        rig.add("a", 0);
        rig.inventory
            .update_item(
                ItemDefId(0),
                ItemUpdate {
                    display_name: Some("Shiny A".to_string()),
                    ..ItemUpdate::default()
                },
            )
            .expect("update");
        assert_eq!(rig.inventory.items()[0].display_name(), "Shiny A");
        assert_eq!(rig.inventory.items()[0].icon(), "a.png");
        assert!(matches!(
            rig.inventory.update_item(ItemDefId(9), ItemUpdate::default()),
            Err(InventoryError::NotInInventory { .. })
        ));
    }

    #[test]
    fn icon_change_reaches_the_box_and_the_held_snapshot() {
        let mut rig = Rig::new();
        let a = rig.add("a", 0);
        rig.settle();
        rig.inventory
            .pick_up(a, &mut rig.cursor, &mut rig.tooltip)
            .expect("pick up");

        rig.inventory
            .update_item(
                ItemDefId(0),
                ItemUpdate {
                    icon: Some("a_lit.png".to_string()),
                    ..ItemUpdate::default()
                },
            )
            .expect("update");

        let entry = rig.inventory.item_box(a).expect("box");
        assert_eq!(entry.icon(), "a_lit.png");
        assert_eq!(entry.display_name(), "A");
        assert_eq!(entry.description(), "a a");
        let held = rig.inventory.carry_view().peek().expect("held");
        assert_eq!(held.icon, "a_lit.png");
    }

    #[test]
    fn item_added_during_a_shuffle_stays_parked_until_its_pickup_starts() {
        let mut rig = Rig::new();
        let a = rig.add("a", 0);
        let b = rig.add("b", 1);
        rig.settle();
        rig.inventory
            .remove_item(a, &mut rig.gate, &mut rig.cursor, &mut rig.tooltip)
            .expect("remove");
        rig.step();

        let c = rig.add("c", 2);
        let start = Vec2::new(200.0, 300.0);
        let mut unparked_after_shuffle = false;
        for _ in 0..600 {
            let shuffling = rig.gate.is_held_by(GateHold::Shuffle);
            let entry = rig.inventory.item_box(c).expect("c");
            if shuffling {
                assert!(entry.is_parked());
                assert_eq!(entry.position(), start);
            } else if !entry.is_parked() {
                unparked_after_shuffle = true;
            }
            if rig.gate.is_open() {
                break;
            }
            rig.step();
        }

        assert!(unparked_after_shuffle);
        assert_eq!(rig.inventory.item_box(b).expect("b").position(), slot_position(0));
        let entry = rig.inventory.item_box(c).expect("c");
        assert!(entry.is_active());
        assert_eq!(entry.position(), slot_position(1));
    }
}
