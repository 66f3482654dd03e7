use tracing::{debug, info};

use super::{ActiveCutscene, Chapter, ChapterError};
use crate::app::events::ChapterEvent;
use crate::app::gate::GateHold;

impl Chapter {
    /// Hands control to an external cutscene: the current location and the
    /// inventory are hidden and input stays closed until `end_cutscene`.
    pub fn play_cutscene(&mut self, cutscene: &str) -> Result<(), ChapterError> {
        if !self.initialized {
            return Err(ChapterError::NotInitialized);
        }
        if let Some(active) = &self.cutscene {
            return Err(ChapterError::CutsceneInProgress {
                active: active.name.clone(),
            });
        }
        self.gate.close(GateHold::Cutscene);
        self.clear_hover();
        self.tooltip.deactivate_hints();
        self.hide_current();
        self.cutscene = Some(ActiveCutscene {
            name: cutscene.to_string(),
            loaded: false,
        });
        info!(cutscene, "cutscene_started");
        self.events.publish(ChapterEvent::LoadCutscene {
            cutscene: cutscene.to_string(),
        });
        Ok(())
    }

    pub fn cutscene_loaded(&mut self) -> Result<(), ChapterError> {
        let active = self.cutscene.as_mut().ok_or(ChapterError::NoCutscene)?;
        if active.loaded {
            debug!(cutscene = %active.name, "cutscene_already_loaded");
            return Ok(());
        }
        active.loaded = true;
        let cutscene = active.name.clone();
        self.events.publish(ChapterEvent::CutsceneLoaded { cutscene });
        Ok(())
    }

    pub fn end_cutscene(&mut self) -> Result<(), ChapterError> {
        let active = self.cutscene.take().ok_or(ChapterError::NoCutscene)?;
        self.events.publish(ChapterEvent::EndCutscene {
            cutscene: active.name.clone(),
        });
        self.show_current();
        self.gate.release(GateHold::Cutscene);
        info!(cutscene = %active.name, "cutscene_ended");
        Ok(())
    }
}
