use tracing::{debug, error, info};

use super::{ActiveCutscene, Chapter};
use crate::app::events::ChapterEvent;
use crate::app::gate::GateHold;
use crate::app::location::{Location, LocationId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum BootPhase {
    #[default]
    NotStarted,
    LoadingInventory,
    /// Locations are initialized one per tick so progress can be reported.
    InitializingLocations {
        next: usize,
    },
    Finished,
}

/// Authoring problem found while choosing the start location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartIssue {
    NoneFlagged,
    MultipleFlagged { count: usize },
}

/// Picks the start location from per-location start flags in discovery
/// order. Zero flags fall back to the first location, several flags keep the
/// first flagged one; both are reported. `None` only for an empty list.
pub fn resolve_start_location(flags: &[bool]) -> Option<(usize, Option<StartIssue>)> {
    if flags.is_empty() {
        return None;
    }
    let mut flagged = flags
        .iter()
        .enumerate()
        .filter(|(_, is_start)| **is_start)
        .map(|(index, _)| index);
    let Some(first) = flagged.next() else {
        return Some((0, Some(StartIssue::NoneFlagged)));
    };
    let extra = flagged.count();
    if extra == 0 {
        Some((first, None))
    } else {
        Some((
            first,
            Some(StartIssue::MultipleFlagged { count: extra + 1 }),
        ))
    }
}

impl Chapter {
    /// Closes the gate and schedules the boot sequence. `update` calls this
    /// on the first tick if nobody did before.
    pub fn begin_boot(&mut self) {
        if self.boot != BootPhase::NotStarted {
            debug!(chapter = %self.name, "chapter_boot_already_started");
            return;
        }
        self.gate.close(GateHold::Boot);
        self.boot = BootPhase::LoadingInventory;
        info!(
            chapter = %self.name,
            locations = self.locations.len(),
            "chapter_boot_started"
        );
    }

    pub fn is_booting(&self) -> bool {
        matches!(
            self.boot,
            BootPhase::LoadingInventory | BootPhase::InitializingLocations { .. }
        )
    }

    pub(super) fn step_boot(&mut self) {
        match self.boot {
            BootPhase::LoadingInventory => {
                self.inventory.initialize(&mut self.tooltip);
                self.boot = BootPhase::InitializingLocations { next: 0 };
            }
            BootPhase::InitializingLocations { next } => {
                let total = self.locations.len();
                if let Some(location) = self.locations.get_mut(next) {
                    location.initialize(&mut self.events);
                }
                let fraction = (next + 1) as f32 / total.max(1) as f32;
                self.events
                    .publish(ChapterEvent::LoadingProgress { fraction });
                if next + 1 >= total {
                    self.finish_boot();
                } else {
                    self.boot = BootPhase::InitializingLocations { next: next + 1 };
                }
            }
            BootPhase::NotStarted | BootPhase::Finished => {}
        }
    }

    fn finish_boot(&mut self) {
        let flags: Vec<bool> = self.locations.iter().map(Location::is_start).collect();
        let (index, issue) =
            resolve_start_location(&flags).unwrap_or((0, Some(StartIssue::NoneFlagged)));
        let start = LocationId(index as u32);
        let start_name = self
            .location(start)
            .map(|location| location.name().to_string())
            .unwrap_or_default();
        match issue {
            Some(StartIssue::NoneFlagged) => {
                error!(chapter = %self.name, fallback = %start_name, "start_location_missing");
            }
            Some(StartIssue::MultipleFlagged { count }) => {
                error!(
                    chapter = %self.name,
                    flagged = count,
                    chosen = %start_name,
                    "start_location_ambiguous"
                );
            }
            None => {}
        }

        self.start = start;
        self.current = start;
        self.initialized = true;
        self.boot = BootPhase::Finished;
        info!(chapter = %self.name, start = %start_name, "chapter_initialized");
        self.events.publish(ChapterEvent::ChapterReady { start });

        match self.starting_cutscene.clone() {
            Some(cutscene) => {
                self.gate.close(GateHold::Cutscene);
                self.gate.release(GateHold::Boot);
                self.cutscene = Some(ActiveCutscene {
                    name: cutscene.clone(),
                    loaded: false,
                });
                info!(cutscene = %cutscene, "starting_cutscene_handoff");
                self.events.publish(ChapterEvent::LoadCutscene { cutscene });
            }
            None => {
                self.show_current();
                self.gate.release(GateHold::Boot);
            }
        }
    }
}
