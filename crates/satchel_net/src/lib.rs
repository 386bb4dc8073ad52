//! Satchel Net - inventory replication
//!
//! ## Architecture
//!
//! ```text
//! +-------------+  ClientMessage   +----------------+  ServerMessage   +-------------+
//! |  Observer A |----------------->| AuthorityHost  |----------------->|  Observer B |
//! |  (replica)  |<-----------------| (Inventory +   |<-----------------|  (replica)  |
//! +-------------+   deltas         |  replicator)   |   requests       +-------------+
//!                                  +----------------+
//! ```
//!
//! ## Key Components
//!
//! - [`InventoryReplicator`] - per-peer deltas from inventory and item dirty keys
//! - [`AuthorityHost`] - runs forwarded requests serially, then syncs
//! - [`ObserverClient`] - applies deltas to a replica and forwards requests
//! - [`ReliableChannel`] - transport seam, with an in-process loopback

pub mod channel;
pub mod client;
pub mod codec;
pub mod error;
pub mod host;
pub mod keys;
pub mod message;
pub mod replication;

pub use channel::{loopback_pair, ChannelStats, LoopbackChannel, ReliableChannel};
pub use client::ObserverClient;
pub use codec::{decode, encode, MAX_MESSAGE_BYTES};
pub use error::{NetError, NetResult};
pub use host::{AuthorityHost, HostStats};
pub use keys::PeerKeys;
pub use message::{ClientMessage, ServerMessage};
pub use replication::{InventoryReplicator, ReplicationStats};
