use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::content::ContentError;
use crate::StartupError;

use super::chapter::{Chapter, ChapterError};
use super::frame::FrameSnapshot;
use super::geometry::ScreenSize;
use super::input::InputSnapshot;
use super::metrics::LoopMetrics;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub screen: ScreenSize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            screen: ScreenSize::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load chapter content: {0}")]
    Content(#[from] ContentError),
    #[error("failed to build chapter: {0}")]
    Chapter(#[from] ChapterError),
}

/// One presented frame of a scripted session: how long it took and the
/// pointer state sampled for it.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedFrame {
    pub delta: Duration,
    pub input: InputSnapshot,
}

impl ScriptedFrame {
    pub fn new(delta: Duration, input: InputSnapshot) -> Self {
        Self { delta, input }
    }

    pub fn idle(delta: Duration) -> Self {
        Self::new(delta, InputSnapshot::empty())
    }
}

/// The presentation side of the loop. `after_tick` runs after every chapter
/// tick, `present` once per frame with the pulled snapshot.
pub trait Frontend {
    fn after_tick(&mut self, _chapter: &mut Chapter) {}

    fn present(&mut self, frame: &FrameSnapshot);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub ticks: u64,
    pub simulated: Duration,
    pub dropped_backlog: Duration,
    pub quit_requested: bool,
}

pub fn run_scripted<I, F>(
    config: &LoopConfig,
    chapter: &mut Chapter,
    frames: I,
    frontend: &mut F,
) -> RunSummary
where
    I: IntoIterator<Item = ScriptedFrame>,
    F: Frontend + ?Sized,
{
    let mut metrics = LoopMetrics::new(config.metrics_log_interval);
    run_scripted_with_metrics(config, chapter, frames, frontend, &mut metrics)
}

/// Fixed-step headless loop. Each frame's press edges reach only the first
/// tick run for it; a frame that runs no tick hands them to the next frame.
pub fn run_scripted_with_metrics<I, F>(
    config: &LoopConfig,
    chapter: &mut Chapter,
    frames: I,
    frontend: &mut F,
    metrics: &mut LoopMetrics,
) -> RunSummary
where
    I: IntoIterator<Item = ScriptedFrame>,
    F: Frontend + ?Sized,
{
    let target_tps = config.target_tps.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);

    chapter.set_screen(config.screen);
    info!(
        chapter = %chapter.name(),
        target_tps,
        max_ticks_per_frame,
        screen_width = config.screen.width,
        screen_height = config.screen.height,
        "loop_started"
    );

    let mut accumulator = Duration::ZERO;
    let mut summary = RunSummary::default();
    let mut unconsumed: Option<InputSnapshot> = None;

    for frame in frames {
        let frame_dt = clamp_frame_delta(frame.delta, max_frame_delta);
        accumulator = accumulator.saturating_add(frame_dt);
        let plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
        accumulator = plan.remaining_accumulator;
        if !plan.dropped_backlog.is_zero() {
            warn!(
                dropped_ms = plan.dropped_backlog.as_millis() as u64,
                "sim_backlog_dropped"
            );
            summary.dropped_backlog = summary.dropped_backlog.saturating_add(plan.dropped_backlog);
        }

        let input = match unconsumed.take() {
            Some(earlier) => frame.input.with_presses_from(&earlier),
            None => frame.input,
        };
        if plan.ticks_to_run == 0 {
            unconsumed = Some(input);
        }
        for tick_index in 0..plan.ticks_to_run {
            let tick_input = if tick_index == 0 {
                input
            } else {
                input.without_presses()
            };
            chapter.update(fixed_dt_seconds, &tick_input);
            frontend.after_tick(chapter);
            metrics.record_tick(chapter.gate().is_open());
            summary.ticks = summary.ticks.saturating_add(1);
        }

        frontend.present(&chapter.frame());
        summary.frames = summary.frames.saturating_add(1);
        summary.simulated = summary.simulated.saturating_add(frame_dt);

        if let Some(snapshot) = metrics.end_frame(frame_dt) {
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                gate_closed_ratio = snapshot.gate_closed_ratio,
                peak_ticks_per_frame = snapshot.peak_ticks_per_frame,
                "loop_metrics"
            );
        }

        if input.quit_requested() {
            info!(tick = chapter.tick().0, "quit_requested");
            summary.quit_requested = true;
            break;
        }
    }

    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        simulated_ms = summary.simulated.as_millis() as u64,
        "loop_finished"
    );
    summary
}

struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        let dropped_backlog = accumulator;
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
