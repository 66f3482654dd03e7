mod carried;
mod chapter;
mod cursor;
mod cutscene;
mod events;
mod frame;
mod gate;
mod geometry;
mod input;
mod interactable;
mod inventory;
mod location;
mod loop_runner;
mod metrics;
mod schedule;
mod tooltip;

pub use carried::{
    CarriedItem, CarryError, CarryState, CarryView, DropAnimation, HeldItem, CARRY_POINTER_OFFSET,
};
pub use chapter::{
    resolve_start_location, ActiveCutscene, Chapter, ChapterError, StartIssue, MAX_FADE_SECONDS,
};
pub use cursor::{CursorFeedback, CursorName};
pub use cutscene::{FramePlayer, PlaybackState};
pub use events::{
    ChapterCommand, ChapterEvent, CommandQueue, EventBus, EventHandler, EventKind, SubscriptionId,
};
pub use frame::{BoxView, CameraView, CarriedView, CrossfadeOverlay, FrameSnapshot};
pub use gate::{GateHold, InputGate};
pub use geometry::{ease_sine, screen_to_stage, stage_to_screen, Rect, ScreenSize, Vec2};
pub use input::{InputAction, InputSnapshot};
pub use interactable::{Interactable, InteractableId, InteractionContext};
pub use inventory::{
    local_to_stage, slot_position, stage_to_local, BoxId, Inventory, InventoryBox, InventoryError,
    ItemUpdate, BOX_SIZE, BOX_SPACING, FIRST_BOX_X, PANEL_HEIGHT, PANEL_OFFSET_Y,
};
pub use location::{
    CameraHandle, Crossfade, Location, LocationId, OffscreenTarget, Transition, BACK_DEPTH,
    FRONT_DEPTH,
};
pub use loop_runner::{
    run_scripted, run_scripted_with_metrics, AppError, Frontend, LoopConfig, RunSummary,
    ScriptedFrame,
};
pub use metrics::{LoopMetrics, LoopMetricsSnapshot};
pub use schedule::{Progress, StepOutcome, Tick};
pub use tooltip::{HintLabel, HoverTooltip, TooltipFeedback};
