use serde::{Deserialize, Serialize};

use crate::app::{CursorName, Vec2};

pub const DEFAULT_INVENTORY_SCENE: &str = "inventory";

fn default_true() -> bool {
    true
}

fn default_inventory_scene() -> String {
    DEFAULT_INVENTORY_SCENE.to_string()
}

/// Authoring data for one chapter: its locations in discovery order plus
/// every item that can end up in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChapterDef {
    pub name: String,
    #[serde(default)]
    pub inventory: InventoryDef,
    #[serde(default)]
    pub starting_cutscene: Option<String>,
    pub locations: Vec<LocationDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryDef {
    #[serde(default = "default_inventory_scene")]
    pub scene_name: String,
}

impl Default for InventoryDef {
    fn default() -> Self {
        Self {
            scene_name: default_inventory_scene(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationDef {
    pub name: String,
    #[serde(default)]
    pub start: bool,
    /// Disabled locations are still initialized; see `Location::initialize`.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub interactables: Vec<InteractableDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InteractableDef {
    pub name: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub look: String,
    #[serde(default)]
    pub cursor: CursorName,
    pub bounds: BoundsDef,
    #[serde(default = "default_true")]
    pub starts_active: bool,
}

/// Click area in stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundsDef {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDef {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}
