//! # Events published on the bridge bus.
//!
//! Two kinds of event flow through the bus, both per captured scan:
//! - [`BridgeEventKind::ScanDetected`] — the raw record, published from the
//!   capture path before delivery is scheduled;
//! - [`BridgeEventKind::DeliveryCompleted`] — the outcome of the cloud put,
//!   published from the delivery worker when the attempt resolves.
//!
//! ## Ordering
//! Each event carries a globally unique sequence number (`seq`) that
//! increases monotonically with publish order. For one scan the detected
//! event is always sequenced before its delivery event, but consumers run
//! independently — nothing orders what two different subscribers observe
//! relative to each other.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::cloud::DeliveryOutcome;
use crate::scan::ScanRecord;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification and payload of a bridge event.
#[derive(Clone, Debug)]
pub enum BridgeEventKind {
    /// A document was scanned; carries the full record.
    ScanDetected(ScanRecord),
    /// A cloud delivery attempt resolved; carries the outcome.
    DeliveryCompleted(DeliveryOutcome),
}

/// Bridge event with sequence metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
#[derive(Clone, Debug)]
pub struct BridgeEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification and payload.
    pub kind: BridgeEventKind,
}

impl BridgeEvent {
    fn new(kind: BridgeEventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
        }
    }

    /// Creates a scan-detected event.
    #[inline]
    pub fn scan_detected(record: ScanRecord) -> Self {
        Self::new(BridgeEventKind::ScanDetected(record))
    }

    /// Creates a delivery-completed event.
    #[inline]
    pub fn delivery_completed(outcome: DeliveryOutcome) -> Self {
        Self::new(BridgeEventKind::DeliveryCompleted(outcome))
    }

    /// Returns true for scan-detected events.
    #[inline]
    pub fn is_scan(&self) -> bool {
        matches!(self.kind, BridgeEventKind::ScanDetected(_))
    }

    /// Returns true for delivery-completed events.
    #[inline]
    pub fn is_delivery(&self) -> bool {
        matches!(self.kind, BridgeEventKind::DeliveryCompleted(_))
    }
}
