use std::path::{Path, PathBuf};
use std::time::Duration;

use pointclick_engine::{
    load_chapter_def, resolve_app_paths, AppError, Chapter, LoopConfig, ScriptedFrame,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::behavior::{load_behavior_def, BehaviorError, ReactionTable};
use super::frontend::LogFrontend;
use super::session::build_frames;

const CHAPTER_ENV_VAR: &str = "POINTCLICK_CHAPTER";
const DEFAULT_CHAPTER_FILE: &str = "demo_chapter.json";
const BEHAVIOR_SUFFIX: &str = "behavior.json";

#[derive(Debug, Error)]
pub(crate) enum StartupFailure {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("failed to load chapter behavior: {0}")]
    Behavior(#[from] BehaviorError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) chapter: Chapter,
    pub(crate) frontend: LogFrontend,
    pub(crate) frames: Vec<ScriptedFrame>,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupFailure> {
    init_tracing();
    info!("=== Point & Click Startup ===");

    let paths = resolve_app_paths().map_err(AppError::from)?;
    let chapter_path = paths.chapters_dir.join(chapter_file_from_env());
    wire_chapter(&chapter_path, LoopConfig::default())
}

/// Loads a chapter and its behavior companion and wires them for the loop.
pub(crate) fn wire_chapter(
    chapter_path: &Path,
    config: LoopConfig,
) -> Result<AppWiring, StartupFailure> {
    let def = load_chapter_def(chapter_path).map_err(AppError::from)?;
    let mut chapter = Chapter::new(&def).map_err(AppError::from)?;

    let behavior = load_behavior_def(&behavior_path_for(chapter_path))?;
    let reactions = ReactionTable::compile(&behavior.reactions, &chapter)?;
    info!(
        chapter = %chapter.name(),
        reactions = reactions.len(),
        "behavior_installed"
    );
    reactions.install(chapter.events_mut());

    let tick = Duration::from_secs_f64(1.0 / f64::from(config.target_tps.max(1)));
    let frames = build_frames(&behavior.session, config.screen, tick);
    let frontend = LogFrontend::new(tick.as_secs_f32(), behavior.cutscenes);

    Ok(AppWiring {
        config,
        chapter,
        frontend,
        frames,
    })
}

fn behavior_path_for(chapter_path: &Path) -> PathBuf {
    let stem = chapter_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("chapter");
    chapter_path.with_file_name(format!("{stem}.{BEHAVIOR_SUFFIX}"))
}

fn chapter_file_from_env() -> String {
    std::env::var(CHAPTER_ENV_VAR)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| DEFAULT_CHAPTER_FILE.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behavior_file_sits_next_to_the_chapter() {
        let path = Path::new("assets").join("chapters").join("demo_chapter.json");
        assert_eq!(
            behavior_path_for(&path),
            Path::new("assets")
                .join("chapters")
                .join("demo_chapter.behavior.json")
        );
    }
}
