//! Item definitions and item instances (stacks)

use std::sync::Arc;

use satchel_core::{DirtyKey, InventoryId, ItemId, ItemTypeId};
use serde::{Deserialize, Serialize};

/// Static description of an item type.
///
/// Shared by every instance of the type through an `Arc`; nothing in here
/// changes once the definition has been registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique type identifier
    pub id: ItemTypeId,
    /// Display name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Weight of a single unit
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Whether several units share one slot
    #[serde(default = "default_stackable")]
    pub stackable: bool,
    /// Maximum units per stack (1 when not stackable)
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// World pickup to spawn when dropped
    #[serde(default)]
    pub pickup: Option<String>,
    /// Tags for filtering
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_weight() -> f32 {
    1.0
}

fn default_stackable() -> bool {
    true
}

fn default_max_stack() -> u32 {
    10
}

impl ItemDefinition {
    /// Create a new stackable item definition
    pub fn new(id: impl Into<ItemTypeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            weight: default_weight(),
            stackable: default_stackable(),
            max_stack: default_max_stack(),
            pickup: None,
            tags: Vec::new(),
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set unit weight
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    /// Set max stack size (stackable items hold at least 2)
    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.stackable = true;
        self.max_stack = max.max(2);
        self
    }

    /// Make the item occupy one slot per unit
    pub fn non_stackable(mut self) -> Self {
        self.stackable = false;
        self.max_stack = 1;
        self
    }

    /// Set the pickup spawned when the item is dropped
    pub fn with_pickup(mut self, pickup: impl Into<String>) -> Self {
        self.pickup = Some(pickup.into());
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Check if item has a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check that the values are in their legal ranges.
    ///
    /// The fields are public, so a hand-built definition can carry a
    /// negative weight or a stack size that cannot hold anything.
    pub fn is_valid(&self) -> bool {
        let weight_ok = self.weight.is_finite() && self.weight >= 0.0;
        let stack_ok = if self.stackable {
            self.max_stack >= 2
        } else {
            self.max_stack == 1
        };
        weight_ok && stack_ok
    }

    /// Clamp loaded values into their legal ranges
    pub fn normalized(mut self) -> Self {
        if !self.weight.is_finite() || self.weight < 0.0 {
            self.weight = 0.0;
        }
        if self.stackable {
            self.max_stack = self.max_stack.max(2);
        } else {
            self.max_stack = 1;
        }
        self
    }
}

/// A request to place `quantity` units of a definition into an inventory
#[derive(Debug, Clone)]
pub struct ItemRequest {
    /// What to add
    pub definition: Arc<ItemDefinition>,
    /// How many units
    pub quantity: u32,
}

impl ItemRequest {
    /// Create a new request
    pub fn new(definition: Arc<ItemDefinition>, quantity: u32) -> Self {
        Self {
            definition,
            quantity,
        }
    }

    /// Request a single unit
    pub fn single(definition: Arc<ItemDefinition>) -> Self {
        Self::new(definition, 1)
    }

    /// Weight of one unit of the requested type
    pub fn unit_weight(&self) -> f32 {
        self.definition.weight
    }
}

/// One stack living in an inventory slot.
///
/// Quantity only changes through the owning inventory, which bumps the dirty
/// key on every change.
#[derive(Debug, Clone)]
pub struct Item {
    id: ItemId,
    definition: Arc<ItemDefinition>,
    quantity: u32,
    dirty_key: DirtyKey,
    owner: Option<InventoryId>,
}

impl Item {
    /// Create a fresh, unowned stack
    pub fn new(definition: Arc<ItemDefinition>, quantity: u32) -> Self {
        Self::with_id(ItemId::new(), definition, quantity)
    }

    /// Create a stack with a known identity (replicas mirror the authority's)
    pub fn with_id(id: ItemId, definition: Arc<ItemDefinition>, quantity: u32) -> Self {
        Self {
            id,
            definition,
            quantity,
            dirty_key: DirtyKey::ZERO,
            owner: None,
        }
    }

    /// Instance identity
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Type identity
    pub fn item_type(&self) -> &ItemTypeId {
        &self.definition.id
    }

    /// Shared definition
    pub fn definition(&self) -> &Arc<ItemDefinition> {
        &self.definition
    }

    /// Display name
    pub fn display_name(&self) -> &str {
        &self.definition.name
    }

    /// Description text
    pub fn description(&self) -> &str {
        &self.definition.description
    }

    /// Current quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Weight of a single unit
    pub fn unit_weight(&self) -> f32 {
        self.definition.weight
    }

    /// Whether this stack can hold more than one unit
    pub fn is_stackable(&self) -> bool {
        self.definition.stackable
    }

    /// Maximum units in this stack
    pub fn max_stack_size(&self) -> u32 {
        self.definition.max_stack
    }

    /// Replication key of this stack
    pub fn dirty_key(&self) -> DirtyKey {
        self.dirty_key
    }

    /// Inventory currently holding this stack
    pub fn owner(&self) -> Option<InventoryId> {
        self.owner
    }

    /// Total weight of the stack
    pub fn stack_weight(&self) -> f32 {
        self.quantity as f32 * self.definition.weight
    }

    /// Check if the stack has reached its max size
    pub fn is_stack_full(&self) -> bool {
        self.quantity >= self.definition.max_stack
    }

    /// Units that still fit on top of this stack
    pub fn spare_room(&self) -> u32 {
        self.definition.max_stack.saturating_sub(self.quantity)
    }

    /// Set the quantity.
    ///
    /// Returns `false` and leaves the dirty key alone when the value is
    /// unchanged. Otherwise bumps the key and returns `true`; the owning
    /// inventory treats that as "item modified".
    pub(crate) fn set_quantity(&mut self, quantity: u32) -> bool {
        if quantity == self.quantity {
            return false;
        }
        self.quantity = quantity;
        self.mark_dirty();
        true
    }

    /// Force the stack to be resent to every observer
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty_key.bump();
    }

    pub(crate) fn attach(&mut self, owner: InventoryId) {
        self.owner = Some(owner);
    }

    pub(crate) fn detach(&mut self) {
        self.owner = None;
    }

    /// Overwrite quantity and key from authority state (replicas only)
    pub(crate) fn mirror(&mut self, quantity: u32, key: DirtyKey) -> bool {
        let changed = self.quantity != quantity;
        self.quantity = quantity;
        self.dirty_key = key;
        changed
    }
}
