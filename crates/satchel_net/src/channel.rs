//! Reliable ordered channels
//!
//! The replication layer only needs "send bytes, poll for bytes" with
//! in-order, at-least-once delivery. Real transports implement
//! [`ReliableChannel`]; [`loopback_pair`] gives an in-process pair for tests
//! and the host binary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;

use crate::error::{NetError, NetResult};

/// A reliable, ordered message channel
pub trait ReliableChannel: Send {
    /// Queue a message for delivery
    fn send(&self, data: Vec<u8>) -> NetResult<()>;

    /// Take the next delivered message, if any
    fn try_recv(&self) -> NetResult<Option<Vec<u8>>>;

    /// Check if the other end is still there
    fn is_connected(&self) -> bool;

    /// Get channel statistics
    fn stats(&self) -> ChannelStats;
}

/// Channel statistics
#[derive(Debug, Clone, Default)]
pub struct ChannelStats {
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Total bytes received
    pub bytes_received: u64,
    /// Total messages sent
    pub messages_sent: u64,
    /// Total messages received
    pub messages_received: u64,
}

/// One end of an in-process channel pair
pub struct LoopbackChannel {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
    stats: Arc<Mutex<ChannelStats>>,
    /// Shared by both ends, cleared when either is dropped
    connected: Arc<AtomicBool>,
}

/// Create two connected loopback endpoints
pub fn loopback_pair() -> (LoopbackChannel, LoopbackChannel) {
    let (a_tx, b_rx) = unbounded();
    let (b_tx, a_rx) = unbounded();
    let connected = Arc::new(AtomicBool::new(true));
    (
        LoopbackChannel::new(a_tx, a_rx, connected.clone()),
        LoopbackChannel::new(b_tx, b_rx, connected),
    )
}

impl LoopbackChannel {
    fn new(tx: Sender<Vec<u8>>, rx: Receiver<Vec<u8>>, connected: Arc<AtomicBool>) -> Self {
        Self {
            tx,
            rx,
            stats: Arc::new(Mutex::new(ChannelStats::default())),
            connected,
        }
    }

    /// Messages waiting to be received
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl ReliableChannel for LoopbackChannel {
    fn send(&self, data: Vec<u8>) -> NetResult<()> {
        let len = data.len() as u64;
        self.tx.send(data).map_err(|_| NetError::Closed)?;

        let mut stats = self.stats.lock();
        stats.bytes_sent += len;
        stats.messages_sent += 1;
        Ok(())
    }

    fn try_recv(&self) -> NetResult<Option<Vec<u8>>> {
        match self.rx.try_recv() {
            Ok(data) => {
                let mut stats = self.stats.lock();
                stats.bytes_received += data.len() as u64;
                stats.messages_received += 1;
                Ok(Some(data))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(NetError::Closed),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) || !self.rx.is_empty()
    }

    fn stats(&self) -> ChannelStats {
        self.stats.lock().clone()
    }
}

impl Drop for LoopbackChannel {
    fn drop(&mut self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}
