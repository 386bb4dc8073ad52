//! # satchel_core - Satchel Core
//!
//! Shared primitives for the inventory engine and its replication layer:
//! - **Identifiers**: item instances, inventories, peers and item types
//! - **Dirty keys**: monotonic counters compared per observer
//! - **Roles**: who is allowed to mutate inventory state
//! - **Rejections**: the recoverable failure taxonomy reported to callers
//!
//! Nothing here knows about stacks or weight; that lives in
//! `satchel_inventory`.

pub mod error;
pub mod id;
pub mod key;
pub mod role;

pub use error::*;
pub use id::*;
pub use key::*;
pub use role::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::Rejection;
    pub use crate::id::{InventoryId, ItemId, ItemTypeId, PeerId};
    pub use crate::key::DirtyKey;
    pub use crate::role::NetRole;
}
