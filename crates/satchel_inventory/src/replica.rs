//! Replicated inventory state
//!
//! The authority ships an [`InventoryDelta`] to each observer; the observer
//! applies it with [`Inventory::apply_replicated`]. Deliveries may repeat,
//! so anything not strictly newer than what the replica holds is ignored.

use std::collections::HashMap;

use satchel_core::{DirtyKey, InventoryId, ItemId, ItemTypeId, Rejection, RejectResult};
use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::inventory::Inventory;
use crate::item::Item;

/// Wire state of one stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemState {
    pub id: ItemId,
    pub item_type: ItemTypeId,
    pub quantity: u32,
    pub key: DirtyKey,
}

impl Item {
    /// Snapshot this stack for replication
    pub fn state(&self) -> ItemState {
        ItemState {
            id: self.id(),
            item_type: self.item_type().clone(),
            quantity: self.quantity(),
            key: self.dirty_key(),
        }
    }
}

/// Changes an observer has not seen yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDelta {
    pub inventory: InventoryId,
    /// Authority inventory key at the time of the delta
    pub items_key: DirtyKey,
    /// Full slot order
    pub order: Vec<ItemId>,
    /// Stacks whose key moved since the observer's last sync
    pub changed: Vec<ItemState>,
}

/// Human readable dump of an inventory
#[derive(Debug, Clone, Serialize)]
pub struct InventorySnapshot {
    pub id: InventoryId,
    pub role: satchel_core::NetRole,
    pub capacity: usize,
    pub weight_capacity: f32,
    pub current_weight: f32,
    pub items_key: DirtyKey,
    pub items: Vec<ItemState>,
}

impl Inventory {
    /// Capture the current state
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            id: self.id(),
            role: self.role(),
            capacity: self.capacity(),
            weight_capacity: self.weight_capacity(),
            current_weight: self.current_weight(),
            items_key: self.items_key(),
            items: self.items().iter().map(Item::state).collect(),
        }
    }

    /// Last authority key applied to this replica
    pub fn last_applied_key(&self) -> Option<DirtyKey> {
        self.last_applied
    }

    /// Forget the last applied key so the next delta applies in full, even
    /// when the authority has not moved since.
    pub fn reset_replication(&mut self) {
        self.last_applied = None;
    }

    /// Apply a delta from the authority.
    ///
    /// Returns `Ok(false)` when the delta is stale or a duplicate. Stack
    /// types are resolved through `catalog`; unknown types are skipped.
    /// After [`Inventory::reset_replication`] stack states with the key the
    /// replica already holds are taken as well.
    pub fn apply_replicated(&mut self, delta: &InventoryDelta, catalog: &ItemCatalog) -> RejectResult<bool> {
        if self.has_authority() {
            log::warn!("Ignoring replicated state on authority {}", self.id);
            return Err(Rejection::NotAuthoritative);
        }
        if delta.inventory != self.id {
            log::warn!("Delta for {} delivered to {}", delta.inventory, self.id);
            return Err(Rejection::InvalidItem);
        }
        if let Some(last) = self.last_applied {
            if !delta.items_key.is_newer_than(last) {
                log::debug!("Skipping stale delta {} (have {})", delta.items_key, last);
                return Ok(false);
            }
        }

        let full = self.last_applied.is_none();
        let states: HashMap<ItemId, &ItemState> = delta.changed.iter().map(|s| (s.id, s)).collect();
        let mut previous: HashMap<ItemId, Item> = self.items.drain(..).map(|i| (i.id(), i)).collect();
        let mut rebuilt = Vec::with_capacity(delta.order.len());
        let mut modified = Vec::new();

        for id in &delta.order {
            match (previous.remove(id), states.get(id)) {
                (Some(mut item), Some(state)) => {
                    let newer = state.key.is_newer_than(item.dirty_key());
                    let same = full && state.key == item.dirty_key();
                    if (newer || same) && item.mirror(state.quantity, state.key) {
                        modified.push(*id);
                    }
                    rebuilt.push(item);
                }
                (Some(item), None) => rebuilt.push(item),
                (None, Some(state)) => match catalog.get(&state.item_type) {
                    Some(definition) => {
                        let mut item = Item::with_id(*id, definition, state.quantity);
                        item.mirror(state.quantity, state.key);
                        item.attach(self.id);
                        modified.push(*id);
                        rebuilt.push(item);
                    }
                    None => log::warn!("Unknown item type {} in delta", state.item_type),
                },
                (None, None) => log::warn!("Delta orders {} without sending its state", id),
            }
        }

        for (_, mut item) in previous {
            item.detach();
        }

        self.items = rebuilt;
        self.items_key = delta.items_key;
        self.last_applied = Some(delta.items_key);
        self.batch.changed = true;
        self.batch.modified = modified;
        self.finish_batch();
        Ok(true)
    }
}
