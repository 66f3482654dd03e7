use tracing::debug;

use super::boot::BootPhase;
use super::Chapter;
use crate::app::geometry::screen_to_stage;
use crate::app::input::InputSnapshot;
use crate::app::interactable::{Interactable, InteractableId, InteractionContext};
use crate::app::inventory::BoxId;

/// What the pointer is over. Inventory boxes sit on top of the panel, which
/// sits on top of the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HoverTarget {
    InventoryBox(BoxId),
    InventoryPanel,
    Interactable(InteractableId),
}

impl Chapter {
    /// One scheduler tick: boot progress, pointer feedback, clicks, then every
    /// running animation, then the commands queued during the tick.
    pub fn update(&mut self, dt_seconds: f32, input: &InputSnapshot) {
        self.tick = self.tick.next();
        if let Some(screen) = input.window_size() {
            self.set_screen(screen);
        }
        if self.boot == BootPhase::NotStarted {
            self.begin_boot();
        }
        if self.is_booting() {
            self.step_boot();
            self.apply_commands();
        }

        self.track_pointer(input);
        if self.initialized {
            let accepting_clicks = self.gate.is_open();
            self.update_hover();
            self.handle_clicks(input, accepting_clicks);
            self.handle_location_input(input, accepting_clicks);
        }

        self.step_processes(dt_seconds);
        self.apply_commands();
    }

    fn track_pointer(&mut self, input: &InputSnapshot) {
        if let Some(position_px) = input.cursor_position_px() {
            self.pointer = screen_to_stage(position_px, self.screen);
        }
        self.inventory.follow_pointer(self.pointer);
        self.tooltip.follow_pointer(self.pointer);
    }

    fn hover_target(&self) -> Option<HoverTarget> {
        if let Some(box_id) = self.inventory.box_at(self.pointer) {
            return Some(HoverTarget::InventoryBox(box_id));
        }
        if self.inventory.panel_contains(self.pointer, self.screen.width) {
            return Some(HoverTarget::InventoryPanel);
        }
        if self.cutscene.is_some() {
            return None;
        }
        let location = self.location(self.current)?;
        if !location.is_active() {
            return None;
        }
        location
            .interactable_at(self.pointer)
            .map(HoverTarget::Interactable)
    }

    /// Hover feedback is not gated: it always tracks what is under the pointer.
    fn update_hover(&mut self) {
        let next = self.hover_target();
        if next == self.hover {
            return;
        }
        if let Some(previous) = self.hover.take() {
            self.hover_exit(previous);
        }
        if let Some(next) = next {
            self.hover_enter(next);
        }
        self.hover = next;
    }

    pub(super) fn clear_hover(&mut self) {
        if let Some(previous) = self.hover.take() {
            self.hover_exit(previous);
        }
    }

    fn hover_enter(&mut self, target: HoverTarget) {
        match target {
            HoverTarget::InventoryBox(id) => self.inventory.hover_enter(id, &mut self.tooltip),
            HoverTarget::InventoryPanel => self.inventory.cursor_on_panel(&mut self.cursor),
            HoverTarget::Interactable(id) => self.with_interactable(id, Interactable::hover_enter),
        }
    }

    fn hover_exit(&mut self, target: HoverTarget) {
        match target {
            HoverTarget::InventoryBox(id) => self.inventory.hover_exit(id, &mut self.tooltip),
            HoverTarget::InventoryPanel => self.inventory.cursor_on_panel(&mut self.cursor),
            HoverTarget::Interactable(id) => self.with_interactable(id, Interactable::hover_exit),
        }
    }

    fn with_interactable(
        &mut self,
        id: InteractableId,
        action: impl FnOnce(&Interactable, &mut InteractionContext<'_>),
    ) {
        let Some((location, index)) = self.find_interactable(id) else {
            debug!(interactable = id.0, "interactable_missing");
            return;
        };
        let interactable = &self.locations[location].interactables()[index];
        let mut ctx = InteractionContext {
            tick: self.tick,
            carry: self.inventory.carry_view(),
            cursor: &mut self.cursor,
            tooltip: &mut self.tooltip,
            events: &mut self.events,
        };
        action(interactable, &mut ctx);
    }

    fn handle_clicks(&mut self, input: &InputSnapshot, accepting_clicks: bool) {
        let primary = input.primary_pressed();
        let secondary = input.secondary_pressed();
        if !primary && !secondary {
            return;
        }
        if !accepting_clicks {
            debug!(
                tick = self.tick.0,
                holds = ?self.gate.holds().collect::<Vec<_>>(),
                "click_ignored_gate_closed"
            );
            return;
        }
        if self.inventory.carried().is_dropping() {
            debug!(tick = self.tick.0, "click_ignored_while_dropping");
            return;
        }
        if primary {
            self.primary_click();
        }
        if secondary {
            self.secondary_click();
        }
    }

    fn primary_click(&mut self) {
        match self.hover {
            Some(HoverTarget::Interactable(id)) => {
                self.with_interactable(id, Interactable::left_action);
            }
            Some(HoverTarget::InventoryBox(id)) => {
                if self.inventory.carried().is_carrying() {
                    debug!(box_id = id.0, "box_click_while_carrying");
                    return;
                }
                if let Err(error) = self
                    .inventory
                    .pick_up(id, &mut self.cursor, &mut self.tooltip)
                {
                    debug!(%error, "pick_up_rejected");
                }
            }
            Some(HoverTarget::InventoryPanel) | None => {}
        }
    }

    /// Secondary click while carrying always drops; the hover feedback is then
    /// re-run so it reflects the post-drop state.
    fn secondary_click(&mut self) {
        if self.inventory.carried().is_carrying() {
            self.inventory
                .drop_carried(&mut self.gate, &mut self.tooltip);
            match self.hover {
                Some(HoverTarget::Interactable(id)) => {
                    self.with_interactable(id, Interactable::right_action);
                }
                Some(target) => {
                    self.hover_exit(target);
                    self.hover_enter(target);
                }
                None => {}
            }
            return;
        }
        match self.hover {
            Some(HoverTarget::Interactable(id)) => {
                self.with_interactable(id, Interactable::right_action);
            }
            Some(HoverTarget::InventoryBox(id)) => self.inventory.inspect(id, &mut self.tooltip),
            Some(HoverTarget::InventoryPanel) | None => {}
        }
    }

    /// Location-wide input on the current location: the hint key toggles the
    /// hint overlay, any click dismisses hints and the description. Like
    /// interactable clicks, this waits for the input gate, so hints cannot be
    /// toggled mid-crossfade or while an item flies into the inventory.
    fn handle_location_input(&mut self, input: &InputSnapshot, accepting_clicks: bool) {
        let hint = input.hint_pressed();
        let click = input.primary_pressed() || input.secondary_pressed();
        if !hint && !click {
            return;
        }
        if !accepting_clicks || self.cutscene.is_some() {
            return;
        }
        let now = self.tick;
        let Some(location) = self.locations.get(self.current.0 as usize) else {
            return;
        };
        if !location.is_active() {
            return;
        }
        if hint {
            let shown = self.tooltip.toggle_hints(location.hint_candidates());
            self.tooltip.deactivate_description(now);
            debug!(location = %location.name(), shown, "hints_toggled");
        }
        if click {
            self.tooltip.deactivate_hints();
            self.tooltip.deactivate_description(now);
        }
    }

    fn step_processes(&mut self, dt_seconds: f32) {
        self.step_transitions(dt_seconds);
        self.inventory
            .step(dt_seconds, &mut self.gate, &mut self.cursor, &mut self.tooltip);
        for location in &mut self.locations {
            location.step_shake(dt_seconds);
        }
    }
}
