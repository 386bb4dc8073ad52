//! Satchel Inventory - networked item storage
//!
//! One authoritative [`Inventory`] per container, any number of replicas.
//!
//! # Features
//!
//! - Stackable and single-slot items with per-type max stack sizes
//! - Slot and weight capacity, checked before anything is written
//! - Two-level dirty keys (inventory and item) for delta replication
//! - Use and drop requests forwarded from replicas to the authority
//! - Per-type behaviors and change listeners
//!
//! # Example
//!
//! ```ignore
//! use satchel_inventory::prelude::*;
//!
//! let catalog = ItemCatalog::load("items.toml")?;
//! let mut inventory = Inventory::new(InventoryConfig::new(20, 100.0));
//! let result = inventory.try_add_from_catalog(&catalog, &"iron_ore".into(), 25);
//! assert_eq!(result.outcome, AddOutcome::AddedAll);
//! ```

pub mod add_result;
pub mod behavior;
pub mod catalog;
pub mod config;
pub mod drop;
pub mod inventory;
pub mod item;
pub mod listeners;
pub mod replica;
pub mod request;

pub mod prelude {
    pub use crate::add_result::{AddOutcome, AddResult};
    pub use crate::behavior::{BehaviorRegistry, ConsumeOnUse, ItemBehavior, UseEffect};
    pub use crate::catalog::{CatalogError, CatalogResult, ItemCatalog};
    pub use crate::config::{InventoryConfig, MAX_CAPACITY};
    pub use crate::drop::{CollectingDropSink, DiscardDropSink, DropSink, DroppedStack};
    pub use crate::inventory::Inventory;
    pub use crate::item::{Item, ItemDefinition, ItemRequest};
    pub use crate::listeners::ListenerId;
    pub use crate::replica::{InventoryDelta, InventorySnapshot, ItemState};
    pub use crate::request::{ActionOutcome, InventoryRequest};
}

pub use prelude::*;
