use std::process::ExitCode;

use pointclick_engine::{run_scripted_with_metrics, LoopMetrics};
use tracing::info;

use super::bootstrap::AppWiring;

pub(crate) fn run(mut app: AppWiring) -> ExitCode {
    let mut metrics = LoopMetrics::new(app.config.metrics_log_interval);
    let summary = run_scripted_with_metrics(
        &app.config,
        &mut app.chapter,
        app.frames,
        &mut app.frontend,
        &mut metrics,
    );
    let last_metrics = metrics.latest().unwrap_or_default();
    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        frames_changed = app.frontend.frames_changed(),
        quit_requested = summary.quit_requested,
        tps = last_metrics.tps,
        gate_closed_ratio = last_metrics.gate_closed_ratio,
        metrics_windows = metrics.windows_closed(),
        current_location = app.chapter.current_location().0,
        inventory_items = app.chapter.inventory().items().len(),
        "session_finished"
    );
    ExitCode::SUCCESS
}
