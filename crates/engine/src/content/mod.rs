mod database;
mod loader;
mod types;

pub use database::{ItemDatabase, ItemDefId};
pub use loader::{load_chapter_def, parse_chapter_def, validate_chapter_def, ContentError};
pub use types::{
    BoundsDef, ChapterDef, InteractableDef, InventoryDef, ItemDef, LocationDef,
    DEFAULT_INVENTORY_SCENE,
};
