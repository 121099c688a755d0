//! # Subscriber registry: concurrent membership with self-removal.
//!
//! Registry membership is keyed by handle identity and mutated from three
//! directions at once: subscribe calls adding, closed-token watchers
//! removing, and fan-out reading. A snapshot is taken per fan-out so a
//! removal never blocks or tears an in-progress notification round.
//!
//! ## Architecture
//! ```text
//! Bus ──► spawn_listener ──┬─ ScanDetected      → notify_all_scan
//!                          └─ DeliveryCompleted → notify_all_delivery
//!
//! add(handle) ──► members[id] = handle
//!                      │ watcher: handle.closed() fired
//!                      ▼
//!                 remove(id)        (exactly once, no external help)
//! ```
//!
//! ## Rules
//! - `add` is a no-op when an equal handle (same channel) is present.
//! - A failure notifying one handle never prevents notifying the rest.
//! - `dispose` detaches all watchers and clears membership; in-flight
//!   notification tasks are not awaited.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cloud::DeliveryOutcome;
use crate::events::{BridgeEventKind, Bus};
use crate::scan::ScanRecord;
use crate::subscribers::{HandleId, SubscriberHandle};

/// One registry member: the handle plus its closed-token watcher.
struct Member {
    handle: Arc<SubscriberHandle>,
    watcher: JoinHandle<()>,
}

/// Concurrent set of subscriber handles with automatic deregistration.
pub struct SubscriberRegistry {
    members: RwLock<HashMap<HandleId, Member>>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            members: RwLock::new(HashMap::new()),
        })
    }

    /// Adds a handle; no-op when the same underlying channel is present.
    ///
    /// Wires the handle's closed token to removal, so a handle that faults
    /// later takes itself out of the set.
    pub async fn add(self: &Arc<Self>, handle: Arc<SubscriberHandle>) {
        let id = handle.id();
        let mut members = self.members.write().await;
        if members.contains_key(&id) {
            debug!(?id, "subscriber already in group");
            return;
        }

        let closed = handle.closed();
        let registry = Arc::downgrade(self);
        let watcher = tokio::spawn(async move {
            closed.cancelled().await;
            if let Some(registry) = registry.upgrade() {
                registry.remove(id).await;
            }
        });

        members.insert(id, Member { handle, watcher });
        info!(?id, "subscriber joined group");
    }

    /// Removes the handle with the given identity, if present.
    pub async fn remove(&self, id: HandleId) {
        let member = self.members.write().await.remove(&id);
        if let Some(member) = member {
            member.watcher.abort();
            info!(?id, "subscriber left group");
        }
    }

    /// Returns true when a handle over the same channel is registered.
    pub async fn contains(&self, id: HandleId) -> bool {
        self.members.read().await.contains_key(&id)
    }

    /// Current membership size.
    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    /// Returns true when no subscriber is registered.
    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }

    /// Fans the scan-detected notification out to a membership snapshot.
    pub async fn notify_all_scan(&self, record: &ScanRecord) {
        let handles = self.snapshot().await;
        info!(subscribers = handles.len(), "notify all subscribers of scanned document");
        for handle in handles {
            handle.notify_scan(record);
        }
    }

    /// Fans the delivery-result notification out to a membership snapshot.
    pub async fn notify_all_delivery(&self, outcome: &DeliveryOutcome) {
        let handles = self.snapshot().await;
        info!(
            subscribers = handles.len(),
            "notify all subscribers of delivery result"
        );
        for handle in handles {
            handle.notify_delivery(outcome);
        }
    }

    async fn snapshot(&self) -> Vec<Arc<SubscriberHandle>> {
        self.members
            .read()
            .await
            .values()
            .map(|m| Arc::clone(&m.handle))
            .collect()
    }

    /// Drives both fan-outs from bus events until the token cancels or the
    /// bus closes. Lag skips old events with a warning.
    pub fn spawn_listener(self: &Arc<Self>, bus: &Bus, token: CancellationToken) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        let me = Arc::clone(self);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => match ev.kind {
                            BridgeEventKind::ScanDetected(record) => {
                                me.notify_all_scan(&record).await;
                            }
                            BridgeEventKind::DeliveryCompleted(outcome) => {
                                me.notify_all_delivery(&outcome).await;
                            }
                        },
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "registry listener lagged behind the bus");
                            continue;
                        }
                    }
                }
            }
        })
    }

    /// Detaches all closed-token wiring and clears membership.
    pub async fn dispose(&self) {
        let members: Vec<Member> = {
            let mut guard = self.members.write().await;
            guard.drain().map(|(_, m)| m).collect()
        };
        for member in &members {
            member.watcher.abort();
        }
        debug!(removed = members.len(), "subscriber group disposed");
    }
}
