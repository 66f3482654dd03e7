use super::chapter::Chapter;
use super::cursor::CursorName;
use super::geometry::Vec2;
use super::inventory::{local_to_stage, BoxId};
use super::location::{LocationId, OffscreenTarget};
use super::schedule::Tick;
use super::tooltip::{HintLabel, HoverTooltip};

#[derive(Debug, Clone, PartialEq)]
pub struct CameraView {
    pub location: LocationId,
    pub background: String,
    pub depth: i32,
    pub shake_offset: Vec2,
    pub offscreen: Option<OffscreenTarget>,
}

/// The outgoing location's buffer, composited over the incoming one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossfadeOverlay {
    pub source: LocationId,
    pub target: OffscreenTarget,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxView {
    pub id: BoxId,
    pub icon: String,
    /// Stage coordinates.
    pub position: Vec2,
    pub active: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarriedView {
    pub icon: String,
    /// Stage coordinates.
    pub position: Vec2,
    pub dropping: bool,
}

/// Everything the presentation layer draws for one frame, pulled from the
/// chapter after its ticks have run.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub tick: Tick,
    /// Enabled cameras, back to front.
    pub cameras: Vec<CameraView>,
    pub crossfade: Option<CrossfadeOverlay>,
    pub cursor: CursorName,
    pub cursor_hotspot: Vec2,
    pub hover_tooltip: Option<HoverTooltip>,
    pub description: Option<String>,
    pub hints: Vec<HintLabel>,
    pub inventory_open: bool,
    pub inventory_line: String,
    /// Slot order. Parked boxes are left out until their pickup starts.
    pub boxes: Vec<BoxView>,
    pub carried: Option<CarriedView>,
    pub gate_open: bool,
    pub cutscene: Option<String>,
}

impl FrameSnapshot {
    pub fn capture(chapter: &Chapter) -> Self {
        let mut cameras: Vec<CameraView> = chapter
            .locations()
            .iter()
            .filter(|location| location.camera().enabled)
            .map(|location| CameraView {
                location: location.id(),
                background: location.background().to_string(),
                depth: location.camera().depth,
                shake_offset: location.camera().shake_offset,
                offscreen: location.camera().offscreen,
            })
            .collect();
        cameras.sort_by_key(|camera| (camera.depth, camera.location));

        let crossfade = chapter
            .crossfade()
            .map(|(_, crossfade)| CrossfadeOverlay {
                source: crossfade.source,
                target: crossfade.target,
                alpha: crossfade.alpha,
            });

        let inventory = chapter.inventory();
        let boxes = inventory
            .items()
            .iter()
            .filter(|entry| !entry.is_parked())
            .map(|entry| BoxView {
                id: entry.id(),
                icon: entry.icon().to_string(),
                position: local_to_stage(entry.position()),
                active: entry.is_active(),
                highlighted: entry.is_highlighted(),
            })
            .collect();
        let carried = inventory.carried();
        let carried_view = carried
            .source_box()
            .and_then(|source_box| inventory.item_box(source_box))
            .map(|entry| CarriedView {
                icon: entry.icon().to_string(),
                position: local_to_stage(carried.position()),
                dropping: carried.is_dropping(),
            });

        let cursor = chapter.cursor().presented();
        let tooltip = chapter.tooltip();
        Self {
            tick: chapter.tick(),
            cameras,
            crossfade,
            cursor,
            cursor_hotspot: cursor.hotspot(),
            hover_tooltip: tooltip.hover().cloned(),
            description: tooltip.description().map(str::to_string),
            hints: tooltip.hints().to_vec(),
            inventory_open: inventory.is_open(),
            inventory_line: tooltip.inventory_line().to_string(),
            boxes,
            carried: carried_view,
            gate_open: chapter.gate().is_open(),
            cutscene: chapter.cutscene().map(|active| active.name.clone()),
        }
    }

    /// Equal apart from the tick stamp; used to skip presenting unchanged frames.
    pub fn same_content(&self, other: &FrameSnapshot) -> bool {
        Self {
            tick: other.tick,
            ..self.clone()
        } == *other
    }
}
