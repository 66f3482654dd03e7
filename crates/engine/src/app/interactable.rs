use tracing::debug;

use super::carried::CarryView;
use super::cursor::{CursorFeedback, CursorName};
use super::events::{ChapterEvent, EventBus};
use super::geometry::{Rect, Vec2};
use super::location::LocationId;
use super::schedule::Tick;
use super::tooltip::{is_blank, TooltipFeedback};
use crate::content::InteractableDef;

/// Chapter-wide interactable id, allocated in authoring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractableId(pub u32);

/// Everything an interactable may touch while handling pointer input. The
/// carried item is read-only here; requests to change it go through commands.
pub struct InteractionContext<'a> {
    pub tick: Tick,
    pub carry: CarryView<'a>,
    pub cursor: &'a mut CursorFeedback,
    pub tooltip: &'a mut TooltipFeedback,
    pub events: &'a mut EventBus,
}

#[derive(Debug, Clone)]
pub struct Interactable {
    id: InteractableId,
    location: LocationId,
    name: String,
    tooltip_text: String,
    look_text: String,
    cursor: CursorName,
    bounds: Rect,
    starts_active: bool,
    active: bool,
    initialized: bool,
}

impl Interactable {
    pub fn from_def(id: InteractableId, location: LocationId, def: &InteractableDef) -> Self {
        Self {
            id,
            location,
            name: def.name.clone(),
            tooltip_text: def.tooltip.clone(),
            look_text: def.look.clone(),
            cursor: def.cursor,
            bounds: Rect::from_center_size(def.bounds.center, def.bounds.width, def.bounds.height),
            starts_active: def.starts_active,
            active: false,
            initialized: false,
        }
    }

    pub fn id(&self) -> InteractableId {
        self.id
    }

    pub fn location(&self) -> LocationId {
        self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tooltip_text(&self) -> &str {
        &self.tooltip_text
    }

    pub fn look_text(&self) -> &str {
        &self.look_text
    }

    pub fn cursor(&self) -> CursorName {
        self.cursor
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// One-time initialization by the owning location during boot.
    pub(crate) fn initialize(&mut self, events: &mut EventBus) {
        if self.initialized {
            debug!(interactable = %self.name, "interactable_already_initialized");
            return;
        }
        self.initialized = true;
        self.active = self.starts_active;
        events.publish(ChapterEvent::Initialized { target: self.id });
    }

    pub fn hit(&self, point: Vec2) -> bool {
        self.initialized && self.active && self.bounds.contains(point)
    }

    pub fn hover_enter(&self, ctx: &mut InteractionContext<'_>) {
        if !self.initialized {
            return;
        }
        if !is_blank(&self.tooltip_text) {
            ctx.tooltip.activate_tooltip(&self.tooltip_text);
        }
        match ctx.carry.prompt(Some(self.tooltip_text.as_str())) {
            Some(prompt) => ctx.tooltip.set_inventory_line(prompt),
            None => ctx.cursor.change(self.cursor),
        }
    }

    pub fn hover_exit(&self, ctx: &mut InteractionContext<'_>) {
        if !self.initialized {
            return;
        }
        ctx.tooltip.deactivate_tooltip();
        match ctx.carry.prompt(None) {
            Some(prompt) => ctx.tooltip.set_inventory_line(prompt),
            None => ctx.cursor.change(CursorName::Main),
        }
    }

    /// Primary click: use the carried item on this target, or a plain interaction.
    pub fn left_action(&self, ctx: &mut InteractionContext<'_>) {
        if !self.initialized {
            return;
        }
        let event = match ctx.carry.peek() {
            Some(held) => ChapterEvent::UseCarriedItemOnTarget {
                target: self.id,
                item: held.item,
                source_box: held.source_box,
            },
            None => ChapterEvent::PrimaryInteract { target: self.id },
        };
        ctx.events.publish(event);
    }

    /// Secondary click. While an item is held (or on its way back after the
    /// click dropped it) only the hover feedback is refreshed.
    pub fn right_action(&self, ctx: &mut InteractionContext<'_>) {
        if !self.initialized {
            return;
        }
        if ctx.carry.is_carrying() || ctx.carry.is_dropping() {
            self.hover_exit(ctx);
            self.hover_enter(ctx);
            return;
        }
        ctx.tooltip.activate_description(&self.look_text, ctx.tick);
    }
}
