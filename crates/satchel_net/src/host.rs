//! Authority side of a replicated inventory
//!
//! The host owns the authoritative [`Inventory`], one channel per observer,
//! and the replicator. Each tick: [`AuthorityHost::pump`] executes forwarded
//! requests one at a time, then [`AuthorityHost::sync`] ships deltas.

use std::collections::BTreeMap;

use satchel_core::PeerId;
use satchel_inventory::{ActionOutcome, DropSink, Inventory};

use crate::channel::ReliableChannel;
use crate::codec::{decode, encode};
use crate::error::{NetError, NetResult};
use crate::message::{ClientMessage, ServerMessage};
use crate::replication::InventoryReplicator;

/// Authoritative inventory with its observers
pub struct AuthorityHost<S: DropSink> {
    inventory: Inventory,
    replicator: InventoryReplicator,
    peers: BTreeMap<PeerId, Box<dyn ReliableChannel>>,
    sink: S,
    stats: HostStats,
}

impl<S: DropSink> AuthorityHost<S> {
    /// Wrap an authoritative inventory
    pub fn new(inventory: Inventory, sink: S) -> NetResult<Self> {
        if !inventory.has_authority() {
            return Err(NetError::Rejected(satchel_core::Rejection::NotAuthoritative));
        }
        Ok(Self {
            inventory,
            replicator: InventoryReplicator::new(),
            peers: BTreeMap::new(),
            sink,
            stats: HostStats::default(),
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable access for server-side game logic
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn replicator(&self) -> &InventoryReplicator {
        &self.replicator
    }

    /// Attach an observer
    pub fn connect(&mut self, peer: PeerId, channel: Box<dyn ReliableChannel>) -> NetResult<()> {
        self.replicator.add_peer(peer.clone())?;
        log::info!("Observer {} connected to {}", peer, self.inventory.id());
        self.peers.insert(peer, channel);
        Ok(())
    }

    /// Detach an observer
    pub fn disconnect(&mut self, peer: &PeerId) -> bool {
        self.replicator.remove_peer(peer);
        let removed = self.peers.remove(peer).is_some();
        if removed {
            log::info!("Observer {} disconnected", peer);
        }
        removed
    }

    /// Connected observers
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Execute every pending observer message; returns how many were handled
    pub fn pump(&mut self) -> NetResult<usize> {
        let mut inbox = Vec::new();
        let mut closed = Vec::new();

        for (peer, channel) in &self.peers {
            loop {
                let bytes = match channel.try_recv() {
                    Ok(Some(bytes)) => bytes,
                    Ok(None) => break,
                    Err(NetError::Closed) => {
                        closed.push(peer.clone());
                        break;
                    }
                    Err(e) => return Err(e),
                };

                match decode::<ClientMessage>(&bytes) {
                    Ok(message) => inbox.push((peer.clone(), message)),
                    Err(e) => {
                        log::warn!("Dropping undecodable message from {}: {}", peer, e);
                        self.stats.malformed += 1;
                    }
                }
            }
        }

        // one request at a time, in peer order
        let handled = inbox.len();
        for (peer, message) in inbox {
            if let Some(reply) = self.handle(&peer, message) {
                if let Err(e) = self.send_to(&peer, &reply) {
                    log::warn!("Could not reply to {}: {}", peer, e);
                }
            }
        }
        for peer in closed {
            self.disconnect(&peer);
        }
        Ok(handled)
    }

    fn handle(&mut self, peer: &PeerId, message: ClientMessage) -> Option<ServerMessage> {
        let inventory = self.inventory.id();
        if message.inventory() != inventory {
            log::warn!(
                "{}",
                NetError::InventoryMismatch {
                    expected: inventory,
                    actual: message.inventory(),
                }
            );
            self.stats.rejected += 1;
            return None;
        }

        match message {
            ClientMessage::Request { request, .. } => {
                self.stats.requests += 1;
                match self.inventory.handle_request(&request, &mut self.sink) {
                    ActionOutcome::Rejected(reason) => {
                        log::debug!("Rejected {:?} from {}: {}", request, peer, reason);
                        self.stats.rejected += 1;
                        Some(ServerMessage::Rejected {
                            inventory,
                            request,
                            reason,
                        })
                    }
                    outcome => {
                        log::debug!("{:?} from {} -> {:?}", request, peer, outcome);
                        None
                    }
                }
            }
            ClientMessage::Resync { .. } => {
                if let Err(e) = self.replicator.reset_peer(peer) {
                    log::warn!("Resync failed: {}", e);
                }
                None
            }
        }
    }

    fn send_to(&mut self, peer: &PeerId, message: &ServerMessage) -> NetResult<()> {
        let channel = self
            .peers
            .get(peer)
            .ok_or_else(|| NetError::UnknownPeer(peer.clone()))?;
        channel.send(encode(message)?)?;
        self.stats.messages_sent += 1;
        Ok(())
    }

    /// Send pending deltas (and a refresh hint when one is due); returns
    /// the number of messages sent
    pub fn sync(&mut self) -> NetResult<usize> {
        let mut outgoing: Vec<(PeerId, ServerMessage)> = self
            .replicator
            .collect_all(&self.inventory)
            .into_iter()
            .map(|(peer, delta)| (peer, ServerMessage::Delta(delta)))
            .collect();

        if self.inventory.take_refresh() {
            let inventory = self.inventory.id();
            outgoing.extend(
                self.peers
                    .keys()
                    .map(|peer| (peer.clone(), ServerMessage::Refresh { inventory })),
            );
        }

        let mut sent = 0;
        let mut closed = Vec::new();
        for (peer, message) in outgoing {
            match self.send_to(&peer, &message) {
                Ok(()) => sent += 1,
                Err(NetError::Closed) => closed.push(peer),
                Err(e) => return Err(e),
            }
        }
        for peer in closed {
            self.disconnect(&peer);
        }
        Ok(sent)
    }

    /// Pump then sync
    pub fn tick(&mut self) -> NetResult<usize> {
        self.pump()?;
        self.sync()
    }

    /// Get host statistics
    pub fn stats(&self) -> HostStats {
        self.stats.clone()
    }
}

/// Host statistics
#[derive(Debug, Clone, Default)]
pub struct HostStats {
    /// Requests executed or refused
    pub requests: u64,
    /// Requests refused
    pub rejected: u64,
    /// Messages that failed to decode
    pub malformed: u64,
    /// Messages sent to observers
    pub messages_sent: u64,
}
