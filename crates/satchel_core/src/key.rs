//! Monotonic dirty keys for replication

use core::fmt;

use serde::{Deserialize, Serialize};

/// A replication dirty key.
///
/// Keys only ever move forward. Observers remember the last value they were
/// sent and compare; a key that differs from the remembered value means the
/// owner changed since that observer's last sync point.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DirtyKey(u64);

impl DirtyKey {
    /// Key of something that has never been modified
    pub const ZERO: DirtyKey = DirtyKey(0);

    /// Create a key from a raw value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Advance the key and return the new value
    #[inline]
    pub fn bump(&mut self) -> DirtyKey {
        self.0 = self.0.wrapping_add(1);
        *self
    }

    /// Get the raw value
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Check whether this key is ahead of `other`
    #[inline]
    pub fn is_newer_than(&self, other: DirtyKey) -> bool {
        self.0 > other.0
    }
}

impl fmt::Debug for DirtyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DirtyKey({})", self.0)
    }
}

impl fmt::Display for DirtyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
