//! Requests forwarded from replicas to the authority

use satchel_core::{ItemId, Rejection};
use serde::{Deserialize, Serialize};

use crate::drop::DropSink;
use crate::inventory::Inventory;

/// An action a replica asks the authority to perform.
///
/// The authority treats the content as untrusted and validates it against
/// its own state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryRequest {
    /// Use an item
    Use { item: ItemId },
    /// Drop some units of an item
    Drop { item: ItemId, quantity: u32 },
}

impl InventoryRequest {
    /// Item the request targets
    pub fn item(&self) -> ItemId {
        match self {
            Self::Use { item } | Self::Drop { item, .. } => *item,
        }
    }
}

/// Outcome of `use_item`, `drop_item` and forwarded requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Executed on the authority
    Applied { consumed: u32 },
    /// Queued for the authority
    Forwarded,
    /// Refused
    Rejected(Rejection),
}

impl Inventory {
    /// Execute a request received from a replica
    pub fn handle_request(&mut self, request: &InventoryRequest, sink: &mut dyn DropSink) -> ActionOutcome {
        if !self.has_authority() {
            log::warn!("Replica {} cannot serve {:?}", self.id(), request);
            return ActionOutcome::Rejected(Rejection::NotAuthoritative);
        }
        match *request {
            InventoryRequest::Use { item } => self.use_item(item),
            InventoryRequest::Drop { item, quantity } => self.drop_item(item, quantity, sink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryConfig;
    use crate::drop::{CollectingDropSink, DiscardDropSink};
    use crate::item::{ItemDefinition, ItemRequest};
    use satchel_core::InventoryId;
    use std::sync::Arc;

    #[test]
    fn test_handle_drop_request() {
        let def = Arc::new(ItemDefinition::new("arrow", "Arrow").with_max_stack(50));
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(def, 20));
        let item = inventory.items()[0].id();
        let mut sink = CollectingDropSink::new();

        let outcome = inventory.handle_request(&InventoryRequest::Drop { item, quantity: 8 }, &mut sink);
        assert_eq!(outcome, ActionOutcome::Applied { consumed: 8 });
        assert_eq!(inventory.get(item).map(|i| i.quantity()), Some(12));
        assert_eq!(sink.drops()[0].quantity, 8);
    }

    #[test]
    fn test_handle_request_for_unknown_item() {
        let mut inventory = Inventory::default();
        let request = InventoryRequest::Use { item: ItemId::new() };
        assert_eq!(
            inventory.handle_request(&request, &mut DiscardDropSink),
            ActionOutcome::Rejected(Rejection::InvalidItem)
        );
    }

    #[test]
    fn test_replica_cannot_serve() {
        let mut replica = Inventory::replica(InventoryId::new(), InventoryConfig::default());
        let request = InventoryRequest::Use { item: ItemId::new() };
        assert_eq!(
            replica.handle_request(&request, &mut DiscardDropSink),
            ActionOutcome::Rejected(Rejection::NotAuthoritative)
        );
        assert!(!replica.has_pending_requests());
    }
}
