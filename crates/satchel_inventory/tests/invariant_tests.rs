//! Invariant tests for satchel_inventory
//!
//! These hold in every reachable state, whatever sequence of calls got there

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;
use parking_lot::Mutex;
use satchel_core::{DirtyKey, InventoryId, ItemTypeId, Rejection};
use satchel_inventory::prelude::*;

fn definitions() -> Vec<Arc<ItemDefinition>> {
    vec![
        Arc::new(ItemDefinition::new("iron_ore", "Iron Ore").with_weight(2.0).with_max_stack(10)),
        Arc::new(ItemDefinition::new("arrow", "Arrow").with_weight(0.1).with_max_stack(64)),
        Arc::new(ItemDefinition::new("sword", "Sword").with_weight(6.0).non_stackable()),
        Arc::new(ItemDefinition::new("feather", "Feather").with_weight(0.0).with_max_stack(5)),
    ]
}

fn assert_invariants(inventory: &Inventory) {
    assert!(inventory.used_slots() <= inventory.capacity());
    assert!(inventory.current_weight() <= inventory.weight_capacity());
    for item in inventory.items() {
        if item.is_stackable() {
            assert!(item.quantity() > 0);
            assert!(item.quantity() <= item.max_stack_size());
        } else {
            assert_eq!(item.quantity(), 1);
        }
    }
}

/// INVARIANT: slot and weight limits hold across mixed traffic
#[test]
fn invariant_limits_hold_under_mixed_traffic() {
    let defs = definitions();
    let mut inventory = Inventory::new(InventoryConfig::new(8, 60.0));

    for step in 0..200u32 {
        let def = &defs[(step as usize * 7) % defs.len()];
        let quantity = if def.stackable { (step * 13) % 23 } else { 1 };
        inventory.try_add(&ItemRequest::new(Arc::clone(def), quantity));
        assert_invariants(&inventory);

        if step % 5 == 0 {
            if let Some(first) = inventory.items().first().map(|i| i.id()) {
                inventory.consume(first, step % 4 + 1);
                assert_invariants(&inventory);
            }
        }
    }
}

/// INVARIANT: every absorbed unit is accounted for
#[test]
fn invariant_stacking_conserves_quantity() {
    let ore = Arc::clone(&definitions()[0]);
    let ore_type = ItemTypeId::new("iron_ore");
    let mut inventory = Inventory::new(InventoryConfig::new(20, 1000.0));
    let mut absorbed = 0;

    for quantity in [3, 17, 1, 9, 25, 4, 10, 6] {
        let result = inventory.try_add(&ItemRequest::new(Arc::clone(&ore), quantity));
        assert_eq!(result.actual_amount_given + result.remaining(), quantity);
        absorbed += result.actual_amount_given;
    }

    assert_eq!(inventory.count_of_type(&ore_type), absorbed);
    assert_relative_eq!(inventory.current_weight(), absorbed as f32 * 2.0);

    // only the last stack may be partial
    let stacks = inventory.find_all_by_type(&ore_type);
    for stack in &stacks[..stacks.len() - 1] {
        assert!(stack.is_stack_full());
    }
}

/// INVARIANT: rejected requests write nothing
#[test]
fn invariant_rejections_leave_no_trace() {
    let defs = definitions();
    let mut inventory = Inventory::new(InventoryConfig::new(2, 12.0));
    inventory.try_add(&ItemRequest::single(Arc::clone(&defs[2])));
    inventory.try_add(&ItemRequest::single(Arc::clone(&defs[2])));
    let key = inventory.items_key();
    let keys: Vec<DirtyKey> = inventory.items().iter().map(|i| i.dirty_key()).collect();

    for def in &defs {
        let result = inventory.try_add(&ItemRequest::new(Arc::clone(def), 1));
        assert_eq!(result.outcome, AddOutcome::AddedNone);
    }

    assert_eq!(inventory.items_key(), key);
    let after: Vec<DirtyKey> = inventory.items().iter().map(|i| i.dirty_key()).collect();
    assert_eq!(after, keys);
}

/// INVARIANT: consuming more than a stack holds returns the stack size
#[test]
fn invariant_consume_clamps_to_quantity() {
    let mut inventory = Inventory::default();
    inventory.try_add(&ItemRequest::new(Arc::clone(&definitions()[1]), 40));
    let arrow = inventory.items()[0].id();

    assert_eq!(inventory.consume(arrow, u32::MAX), 40);
    assert!(inventory.is_empty());
}

/// INVARIANT: a listener cannot re-enter a locked inventory
#[test]
fn invariant_listener_reentry_is_refused() {
    let shared = Arc::new(Mutex::new(Inventory::default()));
    let refused = Arc::new(AtomicU32::new(0));

    {
        let weak = Arc::downgrade(&shared);
        let refused = refused.clone();
        shared.lock().on_changed(move || {
            if let Some(inventory) = weak.upgrade() {
                match inventory.try_lock() {
                    Some(mut guard) => {
                        guard.set_capacity(0);
                    }
                    None => {
                        refused.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
        });
    }

    let ore = Arc::clone(&definitions()[0]);
    let result = shared.lock().try_add(&ItemRequest::new(ore, 12));

    assert_eq!(result.outcome, AddOutcome::AddedAll);
    assert_eq!(refused.load(Ordering::SeqCst), 1);

    let inventory = shared.lock();
    assert_eq!(inventory.capacity(), 20);
    assert_eq!(inventory.used_slots(), 2);
    assert_invariants(&inventory);
}

/// INVARIANT: replicas never mutate locally
#[test]
fn invariant_replica_never_mutates() {
    let defs = definitions();
    let mut replica = Inventory::replica(InventoryId::new(), InventoryConfig::default());

    for def in &defs {
        let result = replica.try_add(&ItemRequest::new(Arc::clone(def), 1));
        assert_eq!(result.rejection, Some(Rejection::NotAuthoritative));
    }

    assert!(replica.is_empty());
    assert_eq!(replica.items_key(), DirtyKey::ZERO);
    assert!(replica.take_requests().is_empty());
}

/// INVARIANT: the weight limit is exact even for weights f32 cannot represent
#[test]
fn invariant_weight_limit_is_exact_for_fractional_weights() {
    let defs: Vec<Arc<ItemDefinition>> = [0.3f32, 0.1, 0.7, 0.15, 1.1]
        .iter()
        .enumerate()
        .map(|(i, &w)| Arc::new(ItemDefinition::new(format!("shard_{}", i), "Shard").with_weight(w).with_max_stack(7)))
        .collect();

    for capacity in [3.3f32, 7.7, 10.1, 0.9] {
        let mut inventory = Inventory::new(InventoryConfig::new(500, capacity));
        let mut seed = 0x9e37_79b9u32;
        for _ in 0..300 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let def = &defs[seed as usize % defs.len()];
            inventory.try_add(&ItemRequest::new(Arc::clone(def), 1 + seed % 5));
            assert_invariants(&inventory);

            if seed % 11 == 0 {
                if let Some(first) = inventory.items().first().map(|i| i.id()) {
                    inventory.consume(first, 1);
                    assert_invariants(&inventory);
                }
            }
        }
    }
}

/// INVARIANT: hand-built definitions outside the legal ranges are refused without a write
#[test]
fn invariant_malformed_definitions_are_refused() {
    let mut empty_stack = ItemDefinition::new("dust", "Dust");
    empty_stack.max_stack = 0;
    let mut one_stack = ItemDefinition::new("coin", "Coin");
    one_stack.max_stack = 1;
    let mut negative = ItemDefinition::new("balloon", "Balloon");
    negative.weight = -0.5;
    let mut nan = ItemDefinition::new("void", "Void");
    nan.weight = f32::NAN;
    let mut infinite = ItemDefinition::new("star", "Star");
    infinite.weight = f32::INFINITY;

    let mut inventory = Inventory::new(InventoryConfig::new(6, 20.0));
    inventory.try_add(&ItemRequest::new(Arc::clone(&definitions()[0]), 4));
    let key = inventory.items_key();

    for def in [empty_stack, one_stack, negative, nan, infinite] {
        let result = inventory.try_add(&ItemRequest::new(Arc::new(def), 5));
        assert_eq!(result.outcome, AddOutcome::AddedNone);
        assert_eq!(result.rejection, Some(Rejection::InvalidItem));
        assert_eq!(result.remaining(), 5);
        assert_invariants(&inventory);
    }
    assert_eq!(inventory.items_key(), key);
    assert_eq!(inventory.used_slots(), 1);
}
