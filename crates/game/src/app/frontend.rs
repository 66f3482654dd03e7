use std::collections::BTreeMap;

use pointclick_engine::{Chapter, FramePlayer, FrameSnapshot, Frontend};
use tracing::{error, info, warn};

use super::behavior::CutsceneDef;

struct PlayingCutscene {
    name: String,
    player: FramePlayer,
}

/// Headless presentation: plays cutscenes as frame lists and logs every
/// frame whose content changed.
pub(crate) struct LogFrontend {
    tick_seconds: f32,
    cutscenes: BTreeMap<String, CutsceneDef>,
    playing: Option<PlayingCutscene>,
    last_frame: Option<FrameSnapshot>,
    frames_presented: u64,
    frames_changed: u64,
}

impl LogFrontend {
    pub(crate) fn new(tick_seconds: f32, cutscenes: BTreeMap<String, CutsceneDef>) -> Self {
        Self {
            tick_seconds,
            cutscenes,
            playing: None,
            last_frame: None,
            frames_presented: 0,
            frames_changed: 0,
        }
    }

    pub(crate) fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub(crate) fn frames_changed(&self) -> u64 {
        self.frames_changed
    }

    pub(crate) fn cutscene_frame(&self) -> Option<&str> {
        self.playing
            .as_ref()
            .and_then(|playing| playing.player.current_frame())
    }

    fn start_cutscene(&mut self, chapter: &mut Chapter, name: String) {
        let Some(def) = self.cutscenes.get(&name) else {
            warn!(cutscene = %name, "cutscene_missing");
            finish(chapter);
            return;
        };
        let mut player = FramePlayer::new(def.frames.clone(), def.frame_seconds);
        player.start();
        if let Err(error) = chapter.cutscene_loaded() {
            error!(cutscene = %name, %error, "cutscene_load_rejected");
            return;
        }
        info!(cutscene = %name, frames = def.frames.len(), "cutscene_playing");
        self.playing = Some(PlayingCutscene { name, player });
    }
}

impl Frontend for LogFrontend {
    fn after_tick(&mut self, chapter: &mut Chapter) {
        let active = chapter
            .cutscene()
            .map(|active| (active.name.clone(), active.loaded));
        match (active, self.playing.as_mut()) {
            (Some((name, false)), None) => self.start_cutscene(chapter, name),
            (Some(_), Some(playing)) => {
                if playing.player.step(self.tick_seconds).is_finished() {
                    info!(cutscene = %playing.name, "cutscene_finished");
                    self.playing = None;
                    finish(chapter);
                }
            }
            (None, Some(playing)) => {
                playing.player.stop();
                self.playing = None;
            }
            (Some((_, true)), None) | (None, None) => {}
        }
    }

    fn present(&mut self, frame: &FrameSnapshot) {
        self.frames_presented = self.frames_presented.saturating_add(1);
        if self
            .last_frame
            .as_ref()
            .is_some_and(|last| last.same_content(frame))
        {
            return;
        }
        self.frames_changed = self.frames_changed.saturating_add(1);
        let location = frame
            .cameras
            .last()
            .map(|camera| camera.background.as_str())
            .unwrap_or("");
        info!(
            tick = frame.tick.0,
            background = location,
            crossfade_alpha = frame.crossfade.map(|overlay| overlay.alpha),
            cursor = ?frame.cursor,
            tooltip = frame.hover_tooltip.as_ref().map(|hover| hover.text.as_str()),
            description = frame.description.as_deref(),
            hints = frame.hints.len(),
            inventory_line = %frame.inventory_line,
            boxes = frame.boxes.len(),
            carrying = frame.carried.is_some(),
            cutscene_frame = self.cutscene_frame(),
            gate_open = frame.gate_open,
            "frame_presented"
        );
        self.last_frame = Some(frame.clone());
    }
}

fn finish(chapter: &mut Chapter) {
    if let Err(error) = chapter.end_cutscene() {
        error!(%error, "cutscene_end_rejected");
    }
}
