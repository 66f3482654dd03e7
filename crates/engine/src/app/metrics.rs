use std::time::Duration;

const DEFAULT_WINDOW: Duration = Duration::from_secs(1);

/// Loop statistics over one window of simulated time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    /// Share of ticks that ran with the input gate closed.
    pub gate_closed_ratio: f32,
    /// Most ticks any single frame of the window had to run.
    pub peak_ticks_per_frame: u32,
}

#[derive(Debug, Default, Clone, Copy)]
struct Window {
    elapsed: Duration,
    frames: u32,
    ticks: u32,
    gate_closed_ticks: u32,
    peak_ticks_per_frame: u32,
}

impl Window {
    fn summarize(&self) -> LoopMetricsSnapshot {
        let seconds = self.elapsed.as_secs_f32().max(f32::EPSILON);
        let frames = self.frames.max(1) as f32;
        LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms: seconds * 1000.0 / frames,
            gate_closed_ratio: if self.ticks == 0 {
                0.0
            } else {
                self.gate_closed_ticks as f32 / self.ticks as f32
            },
            peak_ticks_per_frame: self.peak_ticks_per_frame,
        }
    }
}

/// Windowed loop statistics owned by whoever drives the loop. The runner
/// feeds it frames and ticks; callers read the last closed window.
#[derive(Debug, Clone)]
pub struct LoopMetrics {
    window_length: Duration,
    window: Window,
    ticks_this_frame: u32,
    latest: Option<LoopMetricsSnapshot>,
    windows_closed: u32,
}

impl Default for LoopMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl LoopMetrics {
    /// A zero window length falls back to one second.
    pub fn new(window_length: Duration) -> Self {
        Self {
            window_length: if window_length.is_zero() {
                DEFAULT_WINDOW
            } else {
                window_length
            },
            window: Window::default(),
            ticks_this_frame: 0,
            latest: None,
            windows_closed: 0,
        }
    }

    pub fn window_length(&self) -> Duration {
        self.window_length
    }

    pub fn latest(&self) -> Option<LoopMetricsSnapshot> {
        self.latest
    }

    pub fn windows_closed(&self) -> u32 {
        self.windows_closed
    }

    pub(crate) fn record_tick(&mut self, gate_open: bool) {
        self.window.ticks = self.window.ticks.saturating_add(1);
        self.ticks_this_frame = self.ticks_this_frame.saturating_add(1);
        if !gate_open {
            self.window.gate_closed_ticks = self.window.gate_closed_ticks.saturating_add(1);
        }
    }

    /// Ends a frame. Returns the window summary when this frame closes it.
    pub(crate) fn end_frame(&mut self, frame_dt: Duration) -> Option<LoopMetricsSnapshot> {
        self.window.frames = self.window.frames.saturating_add(1);
        self.window.elapsed = self.window.elapsed.saturating_add(frame_dt);
        self.window.peak_ticks_per_frame =
            self.window.peak_ticks_per_frame.max(self.ticks_this_frame);
        self.ticks_this_frame = 0;

        if self.window.elapsed < self.window_length {
            return None;
        }
        let snapshot = self.window.summarize();
        self.window = Window::default();
        self.latest = Some(snapshot);
        self.windows_closed = self.windows_closed.saturating_add(1);
        Some(snapshot)
    }
}
