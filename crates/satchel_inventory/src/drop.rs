//! Dropping items into the world
//!
//! The inventory does not know about the world. When a drop is confirmed on
//! the authority it hands a [`DroppedStack`] to a [`DropSink`], which spawns
//! whatever pickup the game uses.

use std::sync::Arc;

use satchel_core::InventoryId;

use crate::item::ItemDefinition;

/// A stack leaving an inventory
#[derive(Debug, Clone)]
pub struct DroppedStack {
    /// What was dropped
    pub definition: Arc<ItemDefinition>,
    /// How many units
    pub quantity: u32,
    /// Inventory it came from
    pub from: InventoryId,
}

impl DroppedStack {
    /// Pickup class to spawn, if the definition names one
    pub fn pickup(&self) -> Option<&str> {
        self.definition.pickup.as_deref()
    }

    /// Total weight of the dropped units
    pub fn weight(&self) -> f32 {
        self.quantity as f32 * self.definition.weight
    }
}

/// Receives dropped stacks on the authority
pub trait DropSink {
    fn spawn_drop(&mut self, stack: DroppedStack);
}

/// Sink that keeps every drop in memory
#[derive(Debug, Default)]
pub struct CollectingDropSink {
    drops: Vec<DroppedStack>,
}

impl CollectingDropSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops received so far
    pub fn drops(&self) -> &[DroppedStack] {
        &self.drops
    }

    /// Take all received drops
    pub fn take(&mut self) -> Vec<DroppedStack> {
        std::mem::take(&mut self.drops)
    }
}

impl DropSink for CollectingDropSink {
    fn spawn_drop(&mut self, stack: DroppedStack) {
        match stack.pickup() {
            Some(pickup) => log::debug!("Spawning {} x{} as {}", stack.definition.id, stack.quantity, pickup),
            None => log::debug!("Dropped {} x{} with no pickup", stack.definition.id, stack.quantity),
        }
        self.drops.push(stack);
    }
}

/// Sink that discards drops
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardDropSink;

impl DropSink for DiscardDropSink {
    fn spawn_drop(&mut self, stack: DroppedStack) {
        log::debug!("Discarding dropped {} x{}", stack.definition.id, stack.quantity);
    }
}
