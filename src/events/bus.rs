//! # Event bus for broadcasting bridge events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking publishing from the capture path and the delivery workers.
//!
//! ## Architecture
//! ```text
//! Publishers:                          Consumers:
//!   Bridge (scan detected) ──┐
//!                            ├──► Bus ───► registry listener ──► fan-out
//!   ScanStore (delivery) ────┘        └──► in-process observers
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks or awaits.
//! - **Bounded capacity**: one ring buffer shared by all receivers.
//! - **Lag handling**: a slow receiver gets `RecvError::Lagged(n)` and skips
//!   the `n` oldest items.
//! - **No persistence**: an event published with no receivers is dropped;
//!   there is no durable backlog across restarts.

use tokio::sync::broadcast;

use super::event::BridgeEvent;

/// Broadcast channel for bridge events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender); multiple
/// publishers can publish concurrently and every receiver observes a clone
/// of each event.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<BridgeEvent>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (min 1, clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<BridgeEvent>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers the event is dropped; the call still
    /// returns immediately.
    pub fn publish(&self, ev: BridgeEvent) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that observes subsequent events.
    ///
    /// Each call creates an **independent** receiver that only sees events
    /// published after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.tx.subscribe()
    }
}
