//! Network role of an inventory instance

use core::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the connection an inventory instance lives on.
///
/// Exactly one instance per inventory is `Authority`; it alone mutates state.
/// `Observer` instances hold replicated state and forward requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NetRole {
    /// Server side, owns the inventory state
    #[default]
    Authority,
    /// Client side replica
    Observer,
}

impl NetRole {
    /// Check if this role may mutate inventory state
    #[inline]
    pub fn is_authority(&self) -> bool {
        matches!(self, NetRole::Authority)
    }

    /// Check if this role only observes
    #[inline]
    pub fn is_observer(&self) -> bool {
        matches!(self, NetRole::Observer)
    }
}

impl fmt::Display for NetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authority => write!(f, "authority"),
            Self::Observer => write!(f, "observer"),
        }
    }
}
