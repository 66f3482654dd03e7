mod boot;
mod commands;
mod cutscene;
mod input;
mod navigation;

use thiserror::Error;
use tracing::{debug, info};

use super::cursor::CursorFeedback;
use super::events::EventBus;
use super::frame::FrameSnapshot;
use super::gate::{GateHold, InputGate};
use super::geometry::{ScreenSize, Vec2};
use super::interactable::{Interactable, InteractableId};
use super::inventory::{stage_to_local, BoxId, Inventory, InventoryError, ItemUpdate};
use super::location::{Crossfade, Location, LocationId, OffscreenTarget, Transition, FRONT_DEPTH};
use super::schedule::Tick;
use super::tooltip::TooltipFeedback;
use crate::content::{ChapterDef, ItemDatabase, ItemDefId};

pub use boot::{resolve_start_location, StartIssue};
pub use navigation::MAX_FADE_SECONDS;

use boot::BootPhase;
use input::HoverTarget;

#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("chapter '{chapter}' has no locations to activate")]
    NoLocations { chapter: String },
    #[error("location {0:?} does not exist")]
    UnknownLocation(LocationId),
    #[error("interactable {0:?} does not exist")]
    UnknownInteractable(InteractableId),
    #[error("item {0:?} does not exist")]
    UnknownItem(ItemDefId),
    #[error("chapter has not finished booting")]
    NotInitialized,
    #[error("location {0:?} is already the current location")]
    JumpToSelf(LocationId),
    #[error("a transition into {current:?} is still in flight")]
    TransitionInFlight { current: LocationId },
    #[error("cutscene '{active}' is already playing")]
    CutsceneInProgress { active: String },
    #[error("no cutscene is playing")]
    NoCutscene,
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCutscene {
    pub name: String,
    pub loaded: bool,
}

/// Root container: owns the locations, the inventory, the input gate and the
/// feedback widgets, and drives them one tick at a time through `update`.
#[derive(Debug)]
pub struct Chapter {
    name: String,
    items: ItemDatabase,
    locations: Vec<Location>,
    inventory: Inventory,
    start: LocationId,
    current: LocationId,
    gate: InputGate,
    initialized: bool,
    boot: BootPhase,
    cursor: CursorFeedback,
    tooltip: TooltipFeedback,
    events: EventBus,
    tick: Tick,
    hover: Option<HoverTarget>,
    screen: ScreenSize,
    pointer: Vec2,
    starting_cutscene: Option<String>,
    cutscene: Option<ActiveCutscene>,
    next_offscreen: u32,
}

impl Chapter {
    pub fn new(def: &ChapterDef) -> Result<Self, ChapterError> {
        if def.locations.is_empty() {
            return Err(ChapterError::NoLocations {
                chapter: def.name.clone(),
            });
        }

        let mut next_interactable = 0;
        let locations = def
            .locations
            .iter()
            .enumerate()
            .map(|(index, location)| {
                Location::from_def(LocationId(index as u32), location, &mut next_interactable)
            })
            .collect();
        let screen = ScreenSize::default();

        Ok(Self {
            name: def.name.clone(),
            items: ItemDatabase::from_item_defs(def.items.clone()),
            locations,
            inventory: Inventory::new(def.inventory.scene_name.clone()),
            start: LocationId(0),
            current: LocationId(0),
            gate: InputGate::default(),
            initialized: false,
            boot: BootPhase::NotStarted,
            cursor: CursorFeedback::default(),
            tooltip: TooltipFeedback::new(screen),
            events: EventBus::default(),
            tick: Tick::default(),
            hover: None,
            screen,
            pointer: Vec2::ZERO,
            starting_cutscene: def.starting_cutscene.clone(),
            cutscene: None,
            next_offscreen: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn items(&self) -> &ItemDatabase {
        &self.items
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.0 as usize)
    }

    pub fn location_by_name(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.name() == name)
    }

    pub fn current_location(&self) -> LocationId {
        self.current
    }

    /// The resolved start location; meaningful once the chapter is initialized.
    pub fn start_location(&self) -> LocationId {
        self.start
    }

    pub fn active_location_count(&self) -> usize {
        self.locations.iter().filter(|location| location.is_active()).count()
    }

    pub fn interactable(&self, id: InteractableId) -> Option<&Interactable> {
        self.find_interactable(id)
            .map(|(location, index)| &self.locations[location].interactables()[index])
    }

    pub fn interactable_by_name(&self, location: &str, name: &str) -> Option<&Interactable> {
        self.location_by_name(location)?
            .interactables()
            .iter()
            .find(|interactable| interactable.name() == name)
    }

    /// The in-flight crossfade, if any, keyed by its destination.
    pub fn crossfade(&self) -> Option<(LocationId, &Crossfade)> {
        self.locations
            .iter()
            .find_map(|location| match location.transition() {
                Transition::FadingIn(crossfade) => Some((location.id(), crossfade)),
                _ => None,
            })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn gate(&self) -> &InputGate {
        &self.gate
    }

    pub fn cursor(&self) -> &CursorFeedback {
        &self.cursor
    }

    pub fn tooltip(&self) -> &TooltipFeedback {
        &self.tooltip
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe here before the first `update` to observe boot-time events.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn cutscene(&self) -> Option<&ActiveCutscene> {
        self.cutscene.as_ref()
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Last known pointer position in stage coordinates.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn set_screen(&mut self, screen: ScreenSize) {
        self.screen = screen;
        self.tooltip.set_screen(screen);
    }

    pub fn frame(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }

    /// Manual input toggle for the behavior layer, held independently of
    /// every animation hold.
    pub fn set_receiving_inputs(&mut self, receive: bool) {
        if receive {
            self.gate.release(GateHold::External);
        } else {
            self.gate.close(GateHold::External);
        }
    }

    pub fn set_interactable_active(
        &mut self,
        id: InteractableId,
        active: bool,
    ) -> Result<(), ChapterError> {
        let (location, _) = self
            .find_interactable(id)
            .ok_or(ChapterError::UnknownInteractable(id))?;
        let interactable = self.locations[location]
            .interactable_mut(id)
            .ok_or(ChapterError::UnknownInteractable(id))?;
        interactable.set_active(active);
        Ok(())
    }

    /// Puts `item` into the inventory, flying in from the pointer.
    pub fn add_item(&mut self, item: ItemDefId) -> Result<BoxId, ChapterError> {
        let def = self
            .items
            .item_def(item)
            .ok_or(ChapterError::UnknownItem(item))?;
        if self.inventory.contains_item(item) {
            debug!(item = %def.name, "inventory_duplicate_add");
        }
        let start = stage_to_local(self.pointer);
        Ok(self.inventory.add_item(item, def, start, &mut self.gate))
    }

    pub fn remove_item(&mut self, item: ItemDefId) -> Result<(), ChapterError> {
        let box_id = self
            .inventory
            .box_for_item(item)
            .ok_or(InventoryError::NotInInventory { item })?;
        self.inventory
            .remove_item(box_id, &mut self.gate, &mut self.cursor, &mut self.tooltip)?;
        Ok(())
    }

    /// Makes the item in `box_id` the carried item.
    pub fn pick_up(&mut self, box_id: BoxId) -> Result<(), ChapterError> {
        self.inventory
            .pick_up(box_id, &mut self.cursor, &mut self.tooltip)?;
        Ok(())
    }

    /// Sends the carried item back to its box. Returns false when nothing is carried.
    pub fn drop_carried_item(&mut self) -> bool {
        self.inventory.drop_carried(&mut self.gate, &mut self.tooltip)
    }

    pub fn show_description(&mut self, text: &str) -> bool {
        self.tooltip.activate_description(text, self.tick)
    }

    pub fn update_item(&mut self, item: ItemDefId, update: ItemUpdate) -> Result<(), ChapterError> {
        self.inventory.update_item(item, update)?;
        Ok(())
    }

    pub fn shake_location(
        &mut self,
        id: LocationId,
        vertical: u32,
        horizontal: u32,
        duration_seconds: f32,
    ) -> Result<(), ChapterError> {
        let index = self.location_index(id)?;
        self.locations[index].shake(vertical, horizontal, duration_seconds);
        Ok(())
    }

    pub fn change_background(
        &mut self,
        id: LocationId,
        background: &str,
    ) -> Result<(), ChapterError> {
        let index = self.location_index(id)?;
        self.locations[index].change_background(background);
        Ok(())
    }

    fn location_index(&self, id: LocationId) -> Result<usize, ChapterError> {
        let index = id.0 as usize;
        if index < self.locations.len() {
            Ok(index)
        } else {
            Err(ChapterError::UnknownLocation(id))
        }
    }

    fn find_interactable(&self, id: InteractableId) -> Option<(usize, usize)> {
        self.locations
            .iter()
            .enumerate()
            .find_map(|(location_index, location)| {
                location
                    .interactables()
                    .iter()
                    .position(|interactable| interactable.id() == id)
                    .map(|index| (location_index, index))
            })
    }

    fn allocate_offscreen(&mut self) -> OffscreenTarget {
        let target = OffscreenTarget(self.next_offscreen);
        self.next_offscreen = self.next_offscreen.wrapping_add(1);
        target
    }

    /// Activates the current location on top and opens the inventory panel.
    fn show_current(&mut self) {
        let Ok(index) = self.location_index(self.current) else {
            return;
        };
        let location = &mut self.locations[index];
        location.set_active(true, &mut self.events);
        location.camera_mut().depth = FRONT_DEPTH;
        self.inventory.set_open(true);
        info!(location = %self.locations[index].name(), "location_shown");
    }

    fn hide_current(&mut self) {
        if let Ok(index) = self.location_index(self.current) {
            self.locations[index].set_active(false, &mut self.events);
        }
        self.inventory.set_open(false);
    }
}
