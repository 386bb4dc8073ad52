//! Messages exchanged between the authority and its observers

use satchel_core::{InventoryId, Rejection};
use satchel_inventory::{InventoryDelta, InventoryRequest};
use serde::{Deserialize, Serialize};

/// Authority to observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Inventory state the observer has not seen
    Delta(InventoryDelta),
    /// Observers should re-query their replica
    Refresh { inventory: InventoryId },
    /// A forwarded request was refused
    Rejected {
        inventory: InventoryId,
        request: InventoryRequest,
        reason: Rejection,
    },
}

/// Observer to authority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Ask the authority to perform an action
    Request {
        inventory: InventoryId,
        request: InventoryRequest,
    },
    /// Forget what this observer has seen and resend everything
    Resync { inventory: InventoryId },
}

impl ClientMessage {
    /// Target inventory
    pub fn inventory(&self) -> InventoryId {
        match self {
            Self::Request { inventory, .. } | Self::Resync { inventory } => *inventory,
        }
    }
}
