use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::types::{BoundsDef, ChapterDef};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read chapter file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse chapter json at {field_path}: {message}")]
    Parse { field_path: String, message: String },
    #[error("chapter '{chapter}' declares no locations")]
    NoLocations { chapter: String },
    #[error("location name '{name}' is declared more than once")]
    DuplicateLocation { name: String },
    #[error("item name '{name}' is declared more than once")]
    DuplicateItem { name: String },
    #[error("location '{location}' declares interactable '{name}' more than once")]
    DuplicateInteractable { location: String, name: String },
    #[error("interactable '{location}/{name}' has invalid bounds: {message}")]
    InvalidBounds {
        location: String,
        name: String,
        message: String,
    },
}

pub fn load_chapter_def(path: &Path) -> Result<ChapterDef, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let chapter = parse_chapter_def(&raw)?;
    info!(
        path = %path.display(),
        chapter = %chapter.name,
        locations = chapter.locations.len(),
        items = chapter.items.len(),
        "chapter_def_loaded"
    );
    Ok(chapter)
}

/// Deserializes and validates a chapter. Parse errors name the JSON field path.
pub fn parse_chapter_def(raw: &str) -> Result<ChapterDef, ContentError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let chapter = serde_path_to_error::deserialize::<_, ChapterDef>(&mut deserializer).map_err(
        |error| {
            let field_path = error.path().to_string();
            ContentError::Parse {
                field_path,
                message: error.into_inner().to_string(),
            }
        },
    )?;
    validate_chapter_def(&chapter)?;
    Ok(chapter)
}

/// Several locations flagged as start are not rejected here; boot corrects them.
pub fn validate_chapter_def(chapter: &ChapterDef) -> Result<(), ContentError> {
    if chapter.locations.is_empty() {
        return Err(ContentError::NoLocations {
            chapter: chapter.name.clone(),
        });
    }

    let mut location_names = HashSet::new();
    for location in &chapter.locations {
        if !location_names.insert(location.name.as_str()) {
            return Err(ContentError::DuplicateLocation {
                name: location.name.clone(),
            });
        }
        let mut interactable_names = HashSet::new();
        for interactable in &location.interactables {
            if !interactable_names.insert(interactable.name.as_str()) {
                return Err(ContentError::DuplicateInteractable {
                    location: location.name.clone(),
                    name: interactable.name.clone(),
                });
            }
            validate_bounds(&interactable.bounds).map_err(|message| {
                ContentError::InvalidBounds {
                    location: location.name.clone(),
                    name: interactable.name.clone(),
                    message,
                }
            })?;
        }
    }

    let mut item_names = HashSet::new();
    for item in &chapter.items {
        if !item_names.insert(item.name.as_str()) {
            return Err(ContentError::DuplicateItem {
                name: item.name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_bounds(bounds: &BoundsDef) -> Result<(), String> {
    let values = [bounds.center.x, bounds.center.y, bounds.width, bounds.height];
    if values.iter().any(|value| !value.is_finite()) {
        return Err("expected finite numbers".to_string());
    }
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Err(format!(
            "expected positive size, got {}x{}",
            bounds.width, bounds.height
        ));
    }
    Ok(())
}
