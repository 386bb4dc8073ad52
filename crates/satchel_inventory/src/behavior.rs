//! Per item type behavior hooks
//!
//! The inventory engine never decides what "using" an item means. Game code
//! registers an [`ItemBehavior`] per item type; the engine calls it on the
//! authority and applies the [`UseEffect`] it returns.

use std::collections::HashMap;
use std::sync::Arc;

use satchel_core::{InventoryId, ItemTypeId};

use crate::item::Item;

/// What a use hook asks the inventory to do afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UseEffect {
    /// Leave the item alone
    #[default]
    None,
    /// Consume this many units of the used stack
    Consume(u32),
}

/// Hooks for one item type. All methods default to doing nothing.
pub trait ItemBehavior: Send + Sync {
    /// Called once when a new stack is placed in an inventory
    fn on_added_to_inventory(&self, _inventory: InventoryId, _item: &Item) {}

    /// Called on the authority when the item is used
    fn on_use(&self, _inventory: InventoryId, _item: &Item) -> UseEffect {
        UseEffect::None
    }
}

/// Behavior that consumes a fixed amount per use
#[derive(Debug, Clone, Copy)]
pub struct ConsumeOnUse(pub u32);

impl ItemBehavior for ConsumeOnUse {
    fn on_use(&self, inventory: InventoryId, item: &Item) -> UseEffect {
        log::debug!("{} used from {} (consume {})", item.item_type(), inventory, self.0);
        UseEffect::Consume(self.0)
    }
}

/// Behaviors keyed by item type
#[derive(Default)]
pub struct BehaviorRegistry {
    behaviors: HashMap<ItemTypeId, Arc<dyn ItemBehavior>>,
}

impl BehaviorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behavior, replacing any previous one for the type
    pub fn register(&mut self, item_type: impl Into<ItemTypeId>, behavior: impl ItemBehavior + 'static) {
        let item_type = item_type.into();
        if self.behaviors.insert(item_type.clone(), Arc::new(behavior)).is_some() {
            log::warn!("Replaced behavior for item type {}", item_type);
        }
    }

    /// Builder form of [`BehaviorRegistry::register`]
    pub fn with(mut self, item_type: impl Into<ItemTypeId>, behavior: impl ItemBehavior + 'static) -> Self {
        self.register(item_type, behavior);
        self
    }

    /// Get the behavior for a type
    pub fn get(&self, item_type: &ItemTypeId) -> Option<&Arc<dyn ItemBehavior>> {
        self.behaviors.get(item_type)
    }

    /// Number of registered behaviors
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    pub(crate) fn dispatch_added(&self, inventory: InventoryId, item: &Item) {
        if let Some(behavior) = self.behaviors.get(item.item_type()) {
            behavior.on_added_to_inventory(inventory, item);
        }
    }

    pub(crate) fn dispatch_use(&self, inventory: InventoryId, item: &Item) -> UseEffect {
        match self.behaviors.get(item.item_type()) {
            Some(behavior) => behavior.on_use(inventory, item),
            None => {
                log::debug!("No use behavior for item type {}", item.item_type());
                UseEffect::None
            }
        }
    }
}

impl std::fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorRegistry")
            .field("types", &self.behaviors.keys().collect::<Vec<_>>())
            .finish()
    }
}
