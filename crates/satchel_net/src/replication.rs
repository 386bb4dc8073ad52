//! Inventory replication
//!
//! Builds per-observer deltas from the two-level dirty keys. A pass for a
//! peer first compares the inventory key; only when it moved are the items
//! scanned, and only items whose key moved are sent.

use std::collections::BTreeMap;

use satchel_core::PeerId;
use satchel_inventory::{Inventory, InventoryDelta};

use crate::error::{NetError, NetResult};
use crate::keys::PeerKeys;

/// Tracks what every observer has seen of one inventory
#[derive(Debug, Default)]
pub struct InventoryReplicator {
    peers: BTreeMap<PeerId, PeerKeys>,
    stats: ReplicationStats,
}

impl InventoryReplicator {
    /// Create a new replicator
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a peer
    pub fn add_peer(&mut self, peer: PeerId) -> NetResult<()> {
        if self.peers.contains_key(&peer) {
            return Err(NetError::DuplicatePeer(peer));
        }
        log::debug!("Tracking peer {}", peer);
        self.peers.insert(peer, PeerKeys::new());
        Ok(())
    }

    /// Stop tracking a peer
    pub fn remove_peer(&mut self, peer: &PeerId) -> bool {
        self.peers.remove(peer).is_some()
    }

    /// Forget a peer's sync point so it receives everything again
    pub fn reset_peer(&mut self, peer: &PeerId) -> NetResult<()> {
        self.peers
            .get_mut(peer)
            .map(PeerKeys::reset)
            .ok_or_else(|| NetError::UnknownPeer(peer.clone()))
    }

    /// Keys recorded for a peer
    pub fn peer_keys(&self, peer: &PeerId) -> Option<&PeerKeys> {
        self.peers.get(peer)
    }

    /// Tracked peers, in order
    pub fn peers(&self) -> impl Iterator<Item = &PeerId> {
        self.peers.keys()
    }

    /// Build the delta one peer is missing, if any
    pub fn collect(&mut self, peer: &PeerId, inventory: &Inventory) -> NetResult<Option<InventoryDelta>> {
        let keys = self
            .peers
            .get_mut(peer)
            .ok_or_else(|| NetError::UnknownPeer(peer.clone()))?;

        self.stats.passes += 1;
        if !keys.inventory_changed(inventory.items_key()) {
            self.stats.skipped += 1;
            return Ok(None);
        }

        let order: Vec<_> = inventory.items().iter().map(|item| item.id()).collect();
        let changed = keys.changed_items(inventory);
        keys.record(inventory.items_key(), &order, &changed);

        self.stats.deltas += 1;
        self.stats.items_sent += changed.len() as u64;
        log::debug!(
            "Delta for {}: key {}, {} of {} items",
            peer,
            inventory.items_key(),
            changed.len(),
            order.len()
        );

        Ok(Some(InventoryDelta {
            inventory: inventory.id(),
            items_key: inventory.items_key(),
            order,
            changed,
        }))
    }

    /// Build deltas for every peer that needs one
    pub fn collect_all(&mut self, inventory: &Inventory) -> Vec<(PeerId, InventoryDelta)> {
        let peers: Vec<PeerId> = self.peers.keys().cloned().collect();
        peers
            .into_iter()
            .filter_map(|peer| match self.collect(&peer, inventory) {
                Ok(Some(delta)) => Some((peer, delta)),
                _ => None,
            })
            .collect()
    }

    /// Get replication statistics
    pub fn stats(&self) -> ReplicationStats {
        self.stats.clone()
    }
}

/// Replication statistics
#[derive(Debug, Clone, Default)]
pub struct ReplicationStats {
    /// Sync passes run
    pub passes: u64,
    /// Passes that found nothing to send
    pub skipped: u64,
    /// Deltas produced
    pub deltas: u64,
    /// Item states sent
    pub items_sent: u64,
}
