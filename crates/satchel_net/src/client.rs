//! Observer side of a replicated inventory

use std::sync::Arc;

use satchel_core::{InventoryId, ItemId, PeerId};
use satchel_inventory::{
    ActionOutcome, DiscardDropSink, Inventory, InventoryConfig, InventoryRequest, ItemCatalog,
};

use crate::channel::ReliableChannel;
use crate::codec::{decode, encode};
use crate::error::NetResult;
use crate::message::{ClientMessage, ServerMessage};

/// A replica connected to its authority
pub struct ObserverClient {
    peer: PeerId,
    inventory: Inventory,
    catalog: Arc<ItemCatalog>,
    channel: Box<dyn ReliableChannel>,
    rejections: Vec<(InventoryRequest, satchel_core::Rejection)>,
    refreshes: u64,
}

impl ObserverClient {
    /// Create a replica of `inventory`
    pub fn new(
        peer: PeerId,
        inventory: InventoryId,
        config: InventoryConfig,
        catalog: Arc<ItemCatalog>,
        channel: Box<dyn ReliableChannel>,
    ) -> Self {
        Self {
            peer,
            inventory: Inventory::replica(inventory, config),
            catalog,
            channel,
            rejections: Vec::new(),
            refreshes: 0,
        }
    }

    pub fn peer(&self) -> &PeerId {
        &self.peer
    }

    /// The local replica
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable replica access (listeners, local queries)
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Ask the authority to use an item
    pub fn use_item(&mut self, item: ItemId) -> NetResult<ActionOutcome> {
        let outcome = self.inventory.use_item(item);
        self.flush()?;
        Ok(outcome)
    }

    /// Ask the authority to drop units of an item
    pub fn drop_item(&mut self, item: ItemId, amount: u32) -> NetResult<ActionOutcome> {
        let outcome = self.inventory.drop_item(item, amount, &mut DiscardDropSink);
        self.flush()?;
        Ok(outcome)
    }

    /// Ask the authority to resend the full state
    pub fn resync(&mut self) -> NetResult<()> {
        self.inventory.reset_replication();
        let message = ClientMessage::Resync {
            inventory: self.inventory.id(),
        };
        self.channel.send(encode(&message)?)
    }

    /// Send queued requests; returns how many went out
    pub fn flush(&mut self) -> NetResult<usize> {
        let inventory = self.inventory.id();
        let requests = self.inventory.take_requests();
        let count = requests.len();
        for request in requests {
            self.channel.send(encode(&ClientMessage::Request { inventory, request })?)?;
        }
        Ok(count)
    }

    /// Apply everything the authority sent; returns how many messages arrived
    pub fn poll(&mut self) -> NetResult<usize> {
        let mut received = 0;
        while let Some(bytes) = self.channel.try_recv()? {
            received += 1;
            let message: ServerMessage = match decode(&bytes) {
                Ok(message) => message,
                Err(e) => {
                    log::warn!("{}: dropping undecodable message: {}", self.peer, e);
                    continue;
                }
            };
            self.apply(message);
        }
        Ok(received)
    }

    fn apply(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Delta(delta) => {
                match self.inventory.apply_replicated(&delta, &self.catalog) {
                    Ok(true) => log::debug!("{} applied delta {}", self.peer, delta.items_key),
                    Ok(false) => {}
                    Err(reason) => log::warn!("{} refused delta: {}", self.peer, reason),
                }
            }
            ServerMessage::Refresh { inventory } if inventory == self.inventory.id() => {
                self.refreshes += 1;
                self.inventory.notify_refresh();
            }
            ServerMessage::Refresh { .. } => {}
            ServerMessage::Rejected { request, reason, .. } => {
                log::info!("{}: {:?} refused: {}", self.peer, request, reason);
                self.rejections.push((request, reason));
            }
        }
    }

    /// Take requests the authority refused
    pub fn take_rejections(&mut self) -> Vec<(InventoryRequest, satchel_core::Rejection)> {
        std::mem::take(&mut self.rejections)
    }

    /// Refresh hints received
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}
