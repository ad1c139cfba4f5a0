//! Inventory Module
//!
//! The player's items, kept as a multiset in acquisition order.

use everlight_data::ItemKind;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Items owned by the player. Duplicates are allowed; order is acquisition order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<ItemKind>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an inventory from a saved item list.
    pub fn from_items(items: Vec<ItemKind>) -> Self {
        Self { items }
    }

    /// Record a picked-up item and return the log line for it.
    pub fn pickup(&mut self, kind: ItemKind) -> String {
        self.items.push(kind);
        info!("picked up {kind} ({} items held)", self.items.len());
        format!("Picked up: {kind}")
    }

    /// Remove the item at `index` if it is a consumable of `kind`.
    ///
    /// Only potions can be consumed. Returns false, leaving the inventory untouched, for any
    /// other kind, an out-of-range index, or an index that holds something else.
    pub fn consume(&mut self, index: usize, kind: ItemKind) -> bool {
        if kind != ItemKind::Potion {
            debug!("{kind} is not consumable");
            return false;
        }
        match self.items.get(index) {
            Some(held) if *held == kind => {
                self.items.remove(index);
                info!("consumed {kind} from slot {index}");
                true
            },
            _ => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<ItemKind> {
        self.items.get(index).copied()
    }

    pub fn contains(&self, kind: ItemKind) -> bool {
        self.items.contains(&kind)
    }

    /// How many of `kind` are held.
    pub fn count(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|held| **held == kind).count()
    }

    pub fn items(&self) -> &[ItemKind] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
