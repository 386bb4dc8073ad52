//! Network errors

use satchel_core::{InventoryId, PeerId, Rejection};
use thiserror::Error;

/// Replication and transport errors
#[derive(Debug, Error)]
pub enum NetError {
    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Channel closed")]
    Closed,

    #[error("Unknown peer: {0}")]
    UnknownPeer(PeerId),

    #[error("Peer already connected: {0}")]
    DuplicatePeer(PeerId),

    #[error("Inventory mismatch: expected {expected}, got {actual}")]
    InventoryMismatch {
        expected: InventoryId,
        actual: InventoryId,
    },

    #[error("Rejected: {0}")]
    Rejected(#[from] Rejection),
}

/// Result type for network operations
pub type NetResult<T> = Result<T, NetError>;
