//! Bridge events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to the two notifications the bridge emits per scan:
//! scan detected and delivery completed.
//!
//! ## Contents
//! - [`BridgeEvent`], [`BridgeEventKind`] — event payloads with sequence metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Bridge::handle_scan` (scan detected), `ScanStore`
//!   (delivery completed).
//! - **Consumers**: `SubscriberRegistry::spawn_listener` (fans out to remote
//!   observers), plus any in-process observer that subscribes directly.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{BridgeEvent, BridgeEventKind};
