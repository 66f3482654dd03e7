use tracing::debug;

use super::schedule::StepOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
    Finished,
}

/// Steps through a list of frame names at a fixed frame time. The stand-in
/// for video playback used by cutscenes.
#[derive(Debug, Clone, Default)]
pub struct FramePlayer {
    frames: Vec<String>,
    frame_seconds: f32,
    looping: bool,
    elapsed: f32,
    index: usize,
    state: PlaybackState,
}

impl FramePlayer {
    pub fn new(frames: Vec<String>, frame_seconds: f32) -> Self {
        Self {
            frames,
            frame_seconds: frame_seconds.max(f32::EPSILON),
            ..Self::default()
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// Starts from the first frame. A running playback is stopped first.
    pub fn start(&mut self) {
        if self.state == PlaybackState::Playing {
            debug!("frame_player_restarted");
            self.stop();
        }
        self.index = 0;
        self.elapsed = 0.0;
        self.state = if self.frames.is_empty() {
            PlaybackState::Finished
        } else {
            PlaybackState::Playing
        };
    }

    /// Keeps the current frame on screen.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Clears the frame and rewinds.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.index = 0;
        self.elapsed = 0.0;
    }

    pub fn step(&mut self, dt_seconds: f32) -> StepOutcome {
        match self.state {
            PlaybackState::Playing => {}
            PlaybackState::Finished => return StepOutcome::Finished,
            PlaybackState::Stopped | PlaybackState::Paused => return StepOutcome::Running,
        }
        self.elapsed += dt_seconds.max(0.0);
        while self.elapsed >= self.frame_seconds {
            self.elapsed -= self.frame_seconds;
            if self.index + 1 < self.frames.len() {
                self.index += 1;
            } else if self.looping {
                self.index = 0;
            } else {
                self.state = PlaybackState::Finished;
                return StepOutcome::Finished;
            }
        }
        StepOutcome::Running
    }

    pub fn current_frame(&self) -> Option<&str> {
        match self.state {
            PlaybackState::Stopped => None,
            _ => self.frames.get(self.index).map(String::as_str),
        }
    }
}
