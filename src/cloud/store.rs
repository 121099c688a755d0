//! # Asynchronous scan store.
//!
//! [`ScanStore`] is the seam between the capture path and the network: it
//! schedules the cloud put on the worker pool and hands back a deferred
//! outcome, so detecting a scan never waits on I/O. When the attempt
//! resolves — delivered or failed — the outcome is published on the bus,
//! where the registry listener and any in-process observer pick it up.
//! Bus delivery isolates observers from each other; a misbehaving one
//! cannot break the store or its peers.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cloud::{CloudClient, DeliveryOutcome};
use crate::events::{BridgeEvent, Bus};
use crate::scan::ScanRecord;

/// Orchestrates asynchronous delivery of scans to the cloud.
pub struct ScanStore {
    client: Arc<CloudClient>,
    bus: Bus,
}

impl ScanStore {
    /// Creates a store that delivers through `client` and reports on `bus`.
    pub fn new(client: CloudClient, bus: Bus) -> Self {
        Self {
            client: Arc::new(client),
            bus,
        }
    }

    /// Schedules one delivery attempt; returns immediately.
    ///
    /// The handle resolves to the attempt's outcome. The same outcome is
    /// also published as [`DeliveryCompleted`](crate::BridgeEventKind) once
    /// the attempt finishes, so callers that only care about notification
    /// may drop the handle.
    pub fn put_async(&self, record: ScanRecord) -> JoinHandle<DeliveryOutcome> {
        debug!(record = %record, "schedule scan delivery");
        let client = Arc::clone(&self.client);
        let bus = self.bus.clone();

        tokio::spawn(async move {
            let outcome = client.put(&record).await;
            debug!(outcome = %outcome, "scan delivery resolved");
            bus.publish(BridgeEvent::delivery_completed(outcome.clone()));
            outcome
        })
    }
}
