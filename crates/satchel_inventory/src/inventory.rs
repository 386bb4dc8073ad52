//! Inventory component
//!
//! The authority instance is the only writer. Every mutating entry point
//! checks the role first and runs all of its guards before the first write,
//! so a rejected call leaves nothing behind. Mutations are grouped into a
//! batch: however many stacks a call touches, the inventory key advances
//! once and listeners fire once, after the item list is no longer borrowed.

use std::collections::VecDeque;
use std::sync::Arc;

use satchel_core::{DirtyKey, InventoryId, ItemId, ItemTypeId, NetRole, Rejection};

use crate::add_result::AddResult;
use crate::behavior::{BehaviorRegistry, UseEffect};
use crate::catalog::ItemCatalog;
use crate::config::{clamp_capacity, clamp_weight_capacity, InventoryConfig};
use crate::drop::{DropSink, DroppedStack};
use crate::item::{Item, ItemDefinition, ItemRequest};
use crate::listeners::{ChangeListeners, ListenerId};
use crate::request::{ActionOutcome, InventoryRequest};

/// Pending notifications of the mutation in progress
#[derive(Debug, Default)]
pub(crate) struct Batch {
    /// Membership or a quantity changed, the inventory key must advance
    pub(crate) dirty: bool,
    /// Listeners must hear about it
    pub(crate) changed: bool,
    /// Items whose quantity changed
    pub(crate) modified: Vec<ItemId>,
}

impl Batch {
    fn item_modified(&mut self, item: ItemId) {
        self.dirty = true;
        self.changed = true;
        if !self.modified.contains(&item) {
            self.modified.push(item);
        }
    }

    fn membership_changed(&mut self) {
        self.dirty = true;
        self.changed = true;
    }
}

/// A networked inventory
#[derive(Debug)]
pub struct Inventory {
    pub(crate) id: InventoryId,
    pub(crate) role: NetRole,
    /// Stacks in slot order
    pub(crate) items: Vec<Item>,
    capacity: usize,
    weight_capacity: f32,
    pub(crate) items_key: DirtyKey,
    /// Last authority key applied to this replica
    pub(crate) last_applied: Option<DirtyKey>,
    behaviors: Arc<BehaviorRegistry>,
    listeners: ChangeListeners,
    /// Requests waiting to be forwarded to the authority
    outgoing: VecDeque<InventoryRequest>,
    refresh_pending: bool,
    pub(crate) batch: Batch,
}

impl Inventory {
    /// Create an authoritative inventory
    pub fn new(config: InventoryConfig) -> Self {
        Self::with_role(InventoryId::new(), NetRole::Authority, config)
    }

    /// Create a replica of an inventory owned by someone else
    pub fn replica(id: InventoryId, config: InventoryConfig) -> Self {
        Self::with_role(id, NetRole::Observer, config)
    }

    /// Create an inventory with an explicit identity and role
    pub fn with_role(id: InventoryId, role: NetRole, config: InventoryConfig) -> Self {
        let config = config.normalized();
        Self {
            id,
            role,
            items: Vec::new(),
            capacity: config.capacity,
            weight_capacity: config.weight_capacity,
            items_key: DirtyKey::ZERO,
            last_applied: None,
            behaviors: Arc::new(BehaviorRegistry::new()),
            listeners: ChangeListeners::new(),
            outgoing: VecDeque::new(),
            refresh_pending: false,
            batch: Batch::default(),
        }
    }

    /// Set the item behaviors
    pub fn with_behaviors(mut self, behaviors: Arc<BehaviorRegistry>) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn id(&self) -> InventoryId {
        self.id
    }

    pub fn role(&self) -> NetRole {
        self.role
    }

    /// Check if this instance may mutate
    pub fn has_authority(&self) -> bool {
        self.role.is_authority()
    }

    /// Inventory dirty key
    pub fn items_key(&self) -> DirtyKey {
        self.items_key
    }

    /// Stacks in slot order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Get inventory capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get weight capacity
    pub fn weight_capacity(&self) -> f32 {
        self.weight_capacity
    }

    /// Get number of used slots
    pub fn used_slots(&self) -> usize {
        self.items.len()
    }

    /// Get number of free slots
    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    /// Check if inventory is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total weight of all stacks
    pub fn current_weight(&self) -> f32 {
        self.items.iter().map(Item::stack_weight).sum()
    }

    // ---- listeners ----

    /// Subscribe to "inventory changed"
    pub fn on_changed<F>(&mut self, handler: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.on_changed(handler)
    }

    /// Subscribe to "item modified"
    pub fn on_item_modified<F>(&mut self, handler: F) -> ListenerId
    where
        F: Fn(ItemId) + Send + Sync + 'static,
    {
        self.listeners.on_item_modified(handler)
    }

    /// Remove a listener
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ---- queries ----

    /// Get an item by identity
    pub fn get(&self, item: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id() == item)
    }

    /// Check membership
    pub fn contains(&self, item: ItemId) -> bool {
        self.get(item).is_some()
    }

    fn index_of(&self, item: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id() == item)
    }

    /// First stack of a type, in slot order
    pub fn find_first_by_type(&self, item_type: &ItemTypeId) -> Option<&Item> {
        self.items.iter().find(|i| i.item_type() == item_type)
    }

    /// All stacks of a type, in slot order
    pub fn find_all_by_type(&self, item_type: &ItemTypeId) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| i.item_type() == item_type)
            .collect()
    }

    /// Check if the first stack of a type holds at least `amount`.
    ///
    /// Only the first stack is looked at; use [`Inventory::count_of_type`]
    /// for a total across stacks.
    pub fn has_at_least(&self, item_type: &ItemTypeId, amount: u32) -> bool {
        self.find_first_by_type(item_type)
            .map(|item| item.quantity() >= amount)
            .unwrap_or(false)
    }

    /// Total quantity of a type across all stacks
    pub fn count_of_type(&self, item_type: &ItemTypeId) -> u32 {
        self.items
            .iter()
            .filter(|i| i.item_type() == item_type)
            .map(Item::quantity)
            .sum()
    }

    // ---- mutation ----

    /// Add items, topping up existing stacks before opening new ones
    pub fn try_add(&mut self, request: &ItemRequest) -> AddResult {
        let requested = request.quantity;

        if !self.has_authority() {
            log::warn!("try_add on observer inventory {}", self.id);
            return AddResult::added_none(requested, Rejection::NotAuthoritative);
        }
        if requested == 0 {
            return AddResult::added_none(0, Rejection::ZeroAmount);
        }
        if !request.definition.is_valid() {
            log::warn!(
                "Rejected {}: weight {} max stack {} out of range",
                request.definition.id,
                request.definition.weight,
                request.definition.max_stack
            );
            return AddResult::added_none(requested, Rejection::InvalidItem);
        }

        // Checked even when the request could be absorbed by top-ups alone
        if self.items.len() + 1 > self.capacity {
            return AddResult::added_none(requested, Rejection::CapacityFull);
        }
        if self.current_weight() + request.unit_weight() > self.weight_capacity {
            return AddResult::added_none(requested, Rejection::WeightExceeded);
        }

        let definition = &request.definition;
        let result = if definition.stackable {
            self.add_stackable(definition, requested)
        } else if requested != 1 {
            log::warn!(
                "Rejected {} x{}: non-stackable items are added one at a time",
                definition.id,
                requested
            );
            AddResult::added_none(requested, Rejection::InvalidItem)
        } else {
            self.place_stack(Arc::clone(definition), 1);
            AddResult::added_all(1)
        };

        log::debug!(
            "try_add {} x{} -> {:?} ({} given)",
            definition.id,
            requested,
            result.outcome,
            result.actual_amount_given
        );
        self.finish_batch();
        result
    }

    /// Resolve a catalog type and add it
    pub fn try_add_from_catalog(
        &mut self,
        catalog: &ItemCatalog,
        item_type: &ItemTypeId,
        quantity: u32,
    ) -> AddResult {
        match catalog.get(item_type) {
            Some(definition) => self.try_add(&ItemRequest::new(definition, quantity)),
            None => {
                log::warn!("Unknown item type {}", item_type);
                AddResult::added_none(quantity, Rejection::InvalidItem)
            }
        }
    }

    fn weight_bound(&self, unit_weight: f32) -> u32 {
        if unit_weight <= 0.0 {
            return u32::MAX;
        }
        let room = (self.weight_capacity - self.current_weight()) / unit_weight;
        room.floor().max(0.0) as u32
    }

    /// Largest amount up to `wanted` whose placement keeps the summed stack
    /// weight within capacity
    fn fit_weight(&self, definition: &ItemDefinition, wanted: u32) -> u32 {
        if definition.weight <= 0.0 || self.weight_after(definition, wanted) <= self.weight_capacity {
            return wanted;
        }
        let (mut fits, mut over) = (0, wanted);
        while over - fits > 1 {
            let mid = fits + (over - fits) / 2;
            if self.weight_after(definition, mid) <= self.weight_capacity {
                fits = mid;
            } else {
                over = mid;
            }
        }
        fits
    }

    /// `current_weight` as it would read after `add_stackable` placed `amount`
    fn weight_after(&self, definition: &ItemDefinition, amount: u32) -> f32 {
        let mut remaining = amount;
        let mut total = 0.0f32;
        for item in &self.items {
            let mut quantity = item.quantity();
            if remaining > 0 && item.item_type() == &definition.id && !item.is_stack_full() {
                let top_up = remaining.min(item.spare_room());
                quantity += top_up;
                remaining -= top_up;
            }
            total += quantity as f32 * item.unit_weight();
        }
        let mut slots = self.capacity.saturating_sub(self.items.len());
        while remaining > 0 && slots > 0 {
            let stack = remaining.min(definition.max_stack);
            total += stack as f32 * definition.weight;
            remaining -= stack;
            slots -= 1;
        }
        total
    }

    fn add_stackable(&mut self, definition: &Arc<ItemDefinition>, requested: u32) -> AddResult {
        let bound = requested.min(self.weight_bound(definition.weight));
        let mut to_add = self.fit_weight(definition, bound);
        if to_add == 0 {
            return AddResult::added_none_with_message(
                requested,
                Rejection::WeightExceeded,
                "Couldn't add any item",
            );
        }

        let mut absorbed = 0;

        for index in 0..self.items.len() {
            if to_add == 0 {
                break;
            }
            let item = &mut self.items[index];
            if item.item_type() != &definition.id || item.is_stack_full() {
                continue;
            }
            let amount = to_add.min(item.spare_room());
            let quantity = item.quantity() + amount;
            if item.set_quantity(quantity) {
                let id = item.id();
                self.batch.item_modified(id);
            }
            to_add -= amount;
            absorbed += amount;
        }

        while to_add > 0 && self.items.len() + 1 <= self.capacity {
            let amount = to_add.min(definition.max_stack);
            self.place_stack(Arc::clone(definition), amount);
            to_add -= amount;
            absorbed += amount;
        }

        if absorbed < requested {
            AddResult::added_some(requested, absorbed, "Couldn't add all items")
        } else {
            AddResult::added_all(requested)
        }
    }

    fn place_stack(&mut self, definition: Arc<ItemDefinition>, quantity: u32) -> ItemId {
        let mut item = Item::new(definition, quantity);
        item.attach(self.id);
        item.mark_dirty();
        self.behaviors.dispatch_added(self.id, &item);

        let id = item.id();
        self.items.push(item);
        self.batch.membership_changed();
        self.batch.item_modified(id);
        id
    }

    /// Remove a stack regardless of its quantity
    pub fn remove(&mut self, item: ItemId) -> bool {
        if !self.has_authority() {
            log::warn!("remove on observer inventory {}", self.id);
            return false;
        }
        if !self.detach_item(item) {
            return false;
        }
        self.finish_batch();
        true
    }

    fn detach_item(&mut self, item: ItemId) -> bool {
        match self.index_of(item) {
            Some(index) => {
                let mut removed = self.items.remove(index);
                removed.detach();
                self.batch.membership_changed();
                true
            }
            None => false,
        }
    }

    /// Consume up to `amount` units of a stack; returns how many went.
    ///
    /// A stack reaching zero is removed in the same batch.
    pub fn consume(&mut self, item: ItemId, amount: u32) -> u32 {
        if !self.has_authority() {
            log::warn!("consume on observer inventory {}", self.id);
            return 0;
        }
        let Some(index) = self.index_of(item) else {
            return 0;
        };

        let current = self.items[index].quantity();
        let consumed = amount.min(current);
        if consumed == 0 {
            return 0;
        }

        let remaining = current - consumed;
        if self.items[index].set_quantity(remaining) {
            self.batch.item_modified(item);
        }
        if remaining == 0 {
            self.detach_item(item);
        } else {
            self.refresh_pending = true;
        }

        log::debug!("Consumed {} of {} ({} left)", consumed, item, remaining);
        self.finish_batch();
        consumed
    }

    /// Use an item.
    ///
    /// On the authority the item type's behavior decides what happens. A
    /// replica queues one request for the authority and changes nothing.
    pub fn use_item(&mut self, item: ItemId) -> ActionOutcome {
        if !self.has_authority() {
            self.forward(InventoryRequest::Use { item });
            return ActionOutcome::Forwarded;
        }
        let Some(target) = self.get(item) else {
            log::warn!("use_item: {} is not in inventory {}", item, self.id);
            return ActionOutcome::Rejected(Rejection::InvalidItem);
        };

        match self.behaviors.dispatch_use(self.id, target) {
            UseEffect::None => ActionOutcome::Applied { consumed: 0 },
            UseEffect::Consume(amount) => ActionOutcome::Applied {
                consumed: self.consume(item, amount),
            },
        }
    }

    /// Drop units of a stack into the world
    pub fn drop_item(&mut self, item: ItemId, amount: u32, sink: &mut dyn DropSink) -> ActionOutcome {
        if !self.has_authority() {
            self.forward(InventoryRequest::Drop {
                item,
                quantity: amount,
            });
            return ActionOutcome::Forwarded;
        }
        let Some(definition) = self.get(item).map(|i| Arc::clone(i.definition())) else {
            log::warn!("drop_item: {} is not in inventory {}", item, self.id);
            return ActionOutcome::Rejected(Rejection::InvalidItem);
        };

        let dropped = self.consume(item, amount);
        if dropped > 0 {
            sink.spawn_drop(DroppedStack {
                definition,
                quantity: dropped,
                from: self.id,
            });
        }
        ActionOutcome::Applied { consumed: dropped }
    }

    /// Change the slot limit. Existing stacks are never evicted.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = clamp_capacity(capacity);
        self.batch.changed = true;
        self.finish_batch();
    }

    /// Change the weight limit. Existing stacks are never evicted.
    pub fn set_weight_capacity(&mut self, weight_capacity: f32) {
        self.weight_capacity = clamp_weight_capacity(weight_capacity);
        self.batch.changed = true;
        self.finish_batch();
    }

    // ---- outgoing ----

    fn forward(&mut self, request: InventoryRequest) {
        log::debug!("Forwarding {:?} from replica {}", request, self.id);
        self.outgoing.push_back(request);
    }

    /// Take requests queued for the authority
    pub fn take_requests(&mut self) -> Vec<InventoryRequest> {
        self.outgoing.drain(..).collect()
    }

    /// Check if requests are waiting to be forwarded
    pub fn has_pending_requests(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Take the "observers should refresh" flag
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.refresh_pending)
    }

    /// Fire "inventory changed" without touching any state.
    ///
    /// Replicas call this when the authority asks them to refresh.
    pub fn notify_refresh(&mut self) {
        self.batch.changed = true;
        self.finish_batch();
    }

    /// Close the current batch: advance the key and notify listeners
    pub(crate) fn finish_batch(&mut self) {
        let batch = std::mem::take(&mut self.batch);
        if batch.dirty {
            self.items_key.bump();
        }
        if batch.changed {
            self.listeners.notify_changed();
        }
        for item in batch.modified {
            self.listeners.notify_item_modified(item);
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(InventoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::add_result::AddOutcome;
    use crate::behavior::ConsumeOnUse;
    use crate::drop::CollectingDropSink;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn ore() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new("iron_ore", "Iron Ore")
                .with_weight(2.0)
                .with_max_stack(10),
        )
    }

    fn sword() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new("sword", "Sword")
                .with_weight(5.0)
                .non_stackable(),
        )
    }

    fn quantities(inventory: &Inventory) -> Vec<u32> {
        inventory.items().iter().map(Item::quantity).collect()
    }

    #[test]
    fn test_add_splits_into_stacks() {
        let mut inventory = Inventory::new(InventoryConfig::new(20, 100.0));
        let result = inventory.try_add(&ItemRequest::new(ore(), 25));

        assert_eq!(result.outcome, AddOutcome::AddedAll);
        assert_eq!(result.actual_amount_given, 25);
        assert_eq!(quantities(&inventory), vec![10, 10, 5]);
        assert_eq!(inventory.current_weight(), 50.0);
    }

    #[test]
    fn test_top_up_before_new_stack() {
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(ore(), 4));
        inventory.try_add(&ItemRequest::new(ore(), 9));

        assert_eq!(quantities(&inventory), vec![10, 3]);
    }

    #[test]
    fn test_weight_bound_partial() {
        let def = Arc::new(
            ItemDefinition::new("brick", "Brick")
                .with_weight(2.0)
                .with_max_stack(20),
        );
        let mut inventory = Inventory::new(InventoryConfig::new(20, 10.0));
        let result = inventory.try_add(&ItemRequest::new(def, 10));

        assert_eq!(result.outcome, AddOutcome::AddedSome);
        assert_eq!(result.actual_amount_given, 5);
        assert_eq!(result.remaining(), 5);
        assert_eq!(inventory.current_weight(), 10.0);
    }

    #[test]
    fn test_weight_rejects_first_unit() {
        let mut inventory = Inventory::new(InventoryConfig::new(20, 1.0));
        let result = inventory.try_add(&ItemRequest::new(ore(), 3));

        assert_eq!(result.outcome, AddOutcome::AddedNone);
        assert_eq!(result.rejection, Some(Rejection::WeightExceeded));
        assert_eq!(result.message, "Too much weight");
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_capacity_full() {
        let mut inventory = Inventory::new(InventoryConfig::new(1, 100.0));
        inventory.try_add(&ItemRequest::single(sword()));
        let key = inventory.items_key();

        let result = inventory.try_add(&ItemRequest::new(ore(), 1));
        assert_eq!(result.outcome, AddOutcome::AddedNone);
        assert_eq!(result.message, "Inventory is full");
        assert_eq!(inventory.items_key(), key);
        assert_eq!(inventory.used_slots(), 1);
    }

    #[test]
    fn test_capacity_check_blocks_pure_top_up() {
        let mut inventory = Inventory::new(InventoryConfig::new(1, 100.0));
        inventory.try_add(&ItemRequest::new(ore(), 3));

        // room in the existing stack, but no spare slot
        let result = inventory.try_add(&ItemRequest::new(ore(), 2));
        assert_eq!(result.rejection, Some(Rejection::CapacityFull));
        assert_eq!(quantities(&inventory), vec![3]);
    }

    #[test]
    fn test_non_stackable() {
        let mut inventory = Inventory::default();
        let result = inventory.try_add(&ItemRequest::new(sword(), 2));
        assert_eq!(result.rejection, Some(Rejection::InvalidItem));
        assert!(inventory.is_empty());

        inventory.try_add(&ItemRequest::single(sword()));
        inventory.try_add(&ItemRequest::single(sword()));
        assert_eq!(quantities(&inventory), vec![1, 1]);
    }

    #[test]
    fn test_zero_amount() {
        let mut inventory = Inventory::default();
        let result = inventory.try_add(&ItemRequest::new(ore(), 0));
        assert_eq!(result.rejection, Some(Rejection::ZeroAmount));
        assert_eq!(inventory.items_key(), DirtyKey::ZERO);
    }

    #[test]
    fn test_zero_weight_items_are_unbounded_by_weight() {
        let def = Arc::new(
            ItemDefinition::new("feather", "Feather")
                .with_weight(0.0)
                .with_max_stack(50),
        );
        let mut inventory = Inventory::new(InventoryConfig::new(3, 0.0));
        let result = inventory.try_add(&ItemRequest::new(def, 120));

        assert_eq!(result.outcome, AddOutcome::AddedAll);
        assert_eq!(quantities(&inventory), vec![50, 50, 20]);
    }

    #[test]
    fn test_rejects_malformed_definition() {
        let mut empty_stack = ItemDefinition::new("dust", "Dust");
        empty_stack.max_stack = 0;
        let mut negative = ItemDefinition::new("balloon", "Balloon");
        negative.weight = -2.0;
        let mut nan = ItemDefinition::new("void", "Void");
        nan.weight = f32::NAN;

        let mut inventory = Inventory::new(InventoryConfig::new(4, 10.0));
        for def in [empty_stack, negative, nan] {
            let result = inventory.try_add(&ItemRequest::new(Arc::new(def), 3));
            assert_eq!(result.outcome, AddOutcome::AddedNone);
            assert_eq!(result.rejection, Some(Rejection::InvalidItem));
            assert_eq!(result.actual_amount_given, 0);
        }
        assert!(inventory.is_empty());
        assert_eq!(inventory.items_key(), DirtyKey::ZERO);
    }

    #[test]
    fn test_weight_bound_survives_rounding() {
        let heavy = Arc::new(ItemDefinition::new("bolt", "Bolt").with_weight(0.3).with_max_stack(64));
        let light = Arc::new(ItemDefinition::new("pin", "Pin").with_weight(0.1).with_max_stack(64));
        let mut inventory = Inventory::new(InventoryConfig::new(500, 3.3));

        for round in 0..40 {
            let def = if round % 2 == 0 { &heavy } else { &light };
            inventory.try_add(&ItemRequest::new(Arc::clone(def), 1 + round % 3));
            assert!(inventory.current_weight() <= inventory.weight_capacity());
        }
        assert!(inventory.weight_capacity() - inventory.current_weight() < 0.1 + 1e-3);
    }

    #[test]
    fn test_items_key_bumps_once_per_add() {
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(ore(), 25));
        assert_eq!(inventory.items_key(), DirtyKey::new(1));

        inventory.try_add(&ItemRequest::new(ore(), 7));
        assert_eq!(inventory.items_key(), DirtyKey::new(2));
    }

    #[test]
    fn test_consume_to_zero_removes() {
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(ore(), 5));
        let id = inventory.items()[0].id();
        let key = inventory.items_key();

        assert_eq!(inventory.consume(id, 5), 5);
        assert!(inventory.is_empty());
        assert_eq!(inventory.items_key(), DirtyKey::new(key.get() + 1));
        assert!(!inventory.take_refresh());
    }

    #[test]
    fn test_consume_clamps() {
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(ore(), 3));
        let id = inventory.items()[0].id();

        assert_eq!(inventory.consume(id, 10), 3);
        assert!(!inventory.contains(id));
        assert_eq!(inventory.consume(id, 1), 0);
    }

    #[test]
    fn test_partial_consume_flags_refresh() {
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(ore(), 6));
        let id = inventory.items()[0].id();

        assert_eq!(inventory.consume(id, 2), 2);
        assert_eq!(inventory.get(id).map(Item::quantity), Some(4));
        assert!(inventory.take_refresh());
        assert!(!inventory.take_refresh());
    }

    #[test]
    fn test_remove() {
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(ore(), 6));
        let id = inventory.items()[0].id();

        assert!(inventory.remove(id));
        assert!(!inventory.remove(id));
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_queries() {
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(ore(), 14));
        inventory.try_add(&ItemRequest::single(sword()));
        let ore_type = ItemTypeId::new("iron_ore");

        assert_eq!(inventory.find_all_by_type(&ore_type).len(), 2);
        assert_eq!(inventory.count_of_type(&ore_type), 14);
        assert!(inventory.has_at_least(&ore_type, 10));
        // only the first stack counts
        assert!(!inventory.has_at_least(&ore_type, 12));
        assert!(!inventory.has_at_least(&ItemTypeId::new("gold"), 1));
        assert_eq!(inventory.free_slots(), 17);
    }

    #[test]
    fn test_use_item_consumes_through_behavior() {
        let behaviors = Arc::new(BehaviorRegistry::new().with("iron_ore", ConsumeOnUse(2)));
        let mut inventory = Inventory::default().with_behaviors(behaviors);
        inventory.try_add(&ItemRequest::new(ore(), 5));
        let id = inventory.items()[0].id();

        assert_eq!(inventory.use_item(id), ActionOutcome::Applied { consumed: 2 });
        assert_eq!(inventory.count_of_type(&ItemTypeId::new("iron_ore")), 3);
        assert_eq!(
            inventory.use_item(ItemId::new()),
            ActionOutcome::Rejected(Rejection::InvalidItem)
        );
    }

    #[test]
    fn test_drop_item() {
        let def = Arc::new(
            ItemDefinition::new("apple", "Apple")
                .with_weight(0.5)
                .with_pickup("pickup_apple"),
        );
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(def, 4));
        let id = inventory.items()[0].id();
        let mut sink = CollectingDropSink::new();

        assert_eq!(
            inventory.drop_item(id, 3, &mut sink),
            ActionOutcome::Applied { consumed: 3 }
        );
        assert_eq!(sink.drops().len(), 1);
        assert_eq!(sink.drops()[0].quantity, 3);
        assert_eq!(sink.drops()[0].pickup(), Some("pickup_apple"));
        assert_eq!(sink.drops()[0].from, inventory.id());
    }

    #[test]
    fn test_observer_rejects_and_forwards() {
        let mut replica = Inventory::replica(InventoryId::new(), InventoryConfig::default());
        let result = replica.try_add(&ItemRequest::new(ore(), 3));
        assert_eq!(result.rejection, Some(Rejection::NotAuthoritative));
        assert!(replica.is_empty());
        assert!(!replica.has_pending_requests());

        let item = ItemId::new();
        assert_eq!(replica.consume(item, 1), 0);
        assert!(!replica.remove(item));
        assert_eq!(replica.use_item(item), ActionOutcome::Forwarded);

        assert_eq!(replica.take_requests(), vec![InventoryRequest::Use { item }]);
        assert!(replica.take_requests().is_empty());
    }

    #[test]
    fn test_capacity_mutators_never_evict() {
        let mut inventory = Inventory::default();
        inventory.try_add(&ItemRequest::new(ore(), 30));
        let key = inventory.items_key();

        inventory.set_capacity(1);
        inventory.set_weight_capacity(5.0);
        assert_eq!(inventory.used_slots(), 3);
        assert_eq!(inventory.items_key(), key);

        inventory.set_capacity(10_000);
        assert_eq!(inventory.capacity(), 500);
    }

    #[test]
    fn test_listeners_fire_once_per_batch() {
        let changed = Arc::new(AtomicU32::new(0));
        let modified = Arc::new(AtomicU32::new(0));
        let mut inventory = Inventory::default();
        {
            let changed = changed.clone();
            inventory.on_changed(move || {
                changed.fetch_add(1, Ordering::SeqCst);
            });
            let modified = modified.clone();
            inventory.on_item_modified(move |_| {
                modified.fetch_add(1, Ordering::SeqCst);
            });
        }

        inventory.try_add(&ItemRequest::new(ore(), 25));
        assert_eq!(changed.load(Ordering::SeqCst), 1);
        assert_eq!(modified.load(Ordering::SeqCst), 3);

        // rejected adds notify nobody
        inventory.set_capacity(0);
        inventory.try_add(&ItemRequest::new(ore(), 1));
        assert_eq!(changed.load(Ordering::SeqCst), 2);
    }
}
