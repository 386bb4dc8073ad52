//! Rejection taxonomy shared by every mutating entry point

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a mutation request was turned down.
///
/// All rejections are local and recoverable. None of them leave partial
/// writes behind: every check runs before the first write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// Caller is an observer
    #[error("Not authoritative")]
    NotAuthoritative,

    /// No free slot for another stack
    #[error("Inventory is full")]
    CapacityFull,

    /// Weight capacity would be exceeded
    #[error("Too much weight")]
    WeightExceeded,

    /// Item is unknown, not a member, or has an impossible quantity
    #[error("Invalid item")]
    InvalidItem,

    /// Nothing was requested
    #[error("Nothing to add")]
    ZeroAmount,
}

/// Result type alias for operations that can be rejected
pub type RejectResult<T> = Result<T, Rejection>;
