//! Per-peer last-seen dirty keys

use std::collections::HashMap;

use satchel_core::{DirtyKey, ItemId};
use satchel_inventory::{Inventory, ItemState};

/// What one observer has been sent so far
#[derive(Debug, Clone, Default)]
pub struct PeerKeys {
    inventory: Option<DirtyKey>,
    items: HashMap<ItemId, DirtyKey>,
}

impl PeerKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inventory key last sent to this peer
    pub fn inventory_key(&self) -> Option<DirtyKey> {
        self.inventory
    }

    /// Item key last sent to this peer
    pub fn item_key(&self, item: ItemId) -> Option<DirtyKey> {
        self.items.get(&item).copied()
    }

    /// Check if the inventory moved since the last sync
    pub fn inventory_changed(&self, key: DirtyKey) -> bool {
        self.inventory != Some(key)
    }

    /// Check if an item moved since the last sync
    pub fn item_changed(&self, item: ItemId, key: DirtyKey) -> bool {
        self.items.get(&item) != Some(&key)
    }

    /// Collect the states this peer is missing
    pub fn changed_items(&self, inventory: &Inventory) -> Vec<ItemState> {
        inventory
            .items()
            .iter()
            .filter(|item| self.item_changed(item.id(), item.dirty_key()))
            .map(|item| item.state())
            .collect()
    }

    /// Record a sync point and forget items that are gone
    pub fn record(&mut self, key: DirtyKey, order: &[ItemId], sent: &[ItemState]) {
        self.inventory = Some(key);
        for state in sent {
            self.items.insert(state.id, state.key);
        }
        self.items.retain(|id, _| order.contains(id));
    }

    /// Forget everything; the next sync resends the full state
    pub fn reset(&mut self) {
        self.inventory = None;
        self.items.clear();
    }

    /// Number of items tracked
    pub fn tracked_items(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_prune() {
        let a = ItemId::new();
        let b = ItemId::new();
        let mut keys = PeerKeys::new();
        assert!(keys.inventory_changed(DirtyKey::ZERO));

        let sent = vec![
            ItemState {
                id: a,
                item_type: "ore".into(),
                quantity: 1,
                key: DirtyKey::new(1),
            },
            ItemState {
                id: b,
                item_type: "ore".into(),
                quantity: 2,
                key: DirtyKey::new(1),
            },
        ];
        keys.record(DirtyKey::new(1), &[a, b], &sent);
        assert!(!keys.inventory_changed(DirtyKey::new(1)));
        assert!(!keys.item_changed(a, DirtyKey::new(1)));
        assert!(keys.item_changed(a, DirtyKey::new(2)));

        keys.record(DirtyKey::new(2), &[b], &[]);
        assert_eq!(keys.tracked_items(), 1);
        assert_eq!(keys.item_key(a), None);
    }

    #[test]
    fn test_reset() {
        let mut keys = PeerKeys::new();
        keys.record(DirtyKey::new(4), &[], &[]);
        keys.reset();
        assert_eq!(keys.inventory_key(), None);
    }
}
