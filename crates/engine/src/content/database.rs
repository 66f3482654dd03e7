use std::collections::HashMap;

use super::types::ItemDef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemDefId(pub u32);

#[derive(Debug, Default, Clone)]
pub struct ItemDatabase {
    item_defs: Vec<ItemDef>,
    item_ids_by_name: HashMap<String, ItemDefId>,
}

impl ItemDatabase {
    pub fn from_item_defs(item_defs: Vec<ItemDef>) -> Self {
        let mut item_ids_by_name = HashMap::with_capacity(item_defs.len());
        for (idx, def) in item_defs.iter().enumerate() {
            item_ids_by_name.insert(def.name.clone(), ItemDefId(idx as u32));
        }
        Self {
            item_defs,
            item_ids_by_name,
        }
    }

    pub fn item_def_id_by_name(&self, name: &str) -> Option<ItemDefId> {
        self.item_ids_by_name.get(name).copied()
    }

    pub fn item_def(&self, id: ItemDefId) -> Option<&ItemDef> {
        self.item_defs.get(id.0 as usize)
    }

    pub fn item_defs(&self) -> &[ItemDef] {
        &self.item_defs
    }

    pub fn len(&self) -> usize {
        self.item_defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_defs.is_empty()
    }
}
