//! Inventory limits

use serde::{Deserialize, Serialize};

/// Largest slot count an inventory may be configured with
pub const MAX_CAPACITY: usize = 500;

/// Capacity limits applied when an inventory is created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Maximum number of stacks
    pub capacity: usize,
    /// Maximum total weight
    pub weight_capacity: f32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            weight_capacity: 100.0,
        }
    }
}

impl InventoryConfig {
    pub fn new(capacity: usize, weight_capacity: f32) -> Self {
        Self {
            capacity,
            weight_capacity,
        }
        .normalized()
    }

    /// Clamp both limits into their legal ranges
    pub fn normalized(self) -> Self {
        Self {
            capacity: clamp_capacity(self.capacity),
            weight_capacity: clamp_weight_capacity(self.weight_capacity),
        }
    }
}

pub(crate) fn clamp_capacity(capacity: usize) -> usize {
    capacity.min(MAX_CAPACITY)
}

pub(crate) fn clamp_weight_capacity(weight: f32) -> f32 {
    if weight.is_nan() {
        0.0
    } else {
        weight.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized() {
        let config = InventoryConfig::new(9000, -5.0);
        assert_eq!(config.capacity, MAX_CAPACITY);
        assert_eq!(config.weight_capacity, 0.0);
    }

    #[test]
    fn test_defaults() {
        let config = InventoryConfig::default();
        assert_eq!(config.capacity, 20);
        assert_eq!(config.weight_capacity, 100.0);
    }
}
