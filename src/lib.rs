//! # scanrelay
//!
//! **Scanrelay** bridges a physical identity-document scanner to a cloud
//! ingestion endpoint and to any number of local or remote observer
//! processes.
//!
//! The crate is the distribution and delivery core of that bridge: it turns
//! a captured scan into an asynchronous push to the cloud store, fans the
//! scan and its delivery result out to every live subscriber without ever
//! blocking the capture path, heals a consumer's subscription after
//! transport failure, and bootstraps its own endpoint configuration the
//! first time a specially-encoded document is scanned.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────────┐
//!     │  scanner driver  │ (external: codec, checksums)
//!     └────────┬─────────┘
//!              ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bridge (broker host)                                             │
//! │  - Bus (broadcast: ScanDetected / DeliveryCompleted)              │
//! │  - ScanStore ──► CloudClient ──► cloud PUT endpoint (V1/V2)       │
//! │        │              └─ bootstrap: decode + resolve + persist    │
//! │  - SubscriberRegistry (concurrent set, self-removing handles)     │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   SubscriberHandle   SubscriberHandle   SubscriberHandle
//!   (liveness, async   (…)                (…)
//!    outbound calls)
//!        │ on_scan / on_delivery
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  consumer process                                                 │
//! │  SubscriptionClient: Disconnected → Connecting → Subscribed       │
//! │                         ▲                │ fault                  │
//! │                         └── 5 s timer ── Faulted                  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Per-scan flow
//! ```text
//! Bridge::handle_scan(record)
//!   ├─► Bus.publish(ScanDetected)            (scheduled first)
//!   └─► ScanStore::put_async
//!          └─► CloudClient::put ─► DeliveryOutcome
//!                 └─► Bus.publish(DeliveryCompleted)
//!
//! registry listener: each event ─► snapshot of members ─► per-handle
//! spawned call; a transport error closes that handle, which removes
//! itself from the registry. No cross-subscriber ordering is promised.
//! ```
//!
//! ## Features
//! | Area               | Description                                           | Key types / traits                         |
//! |--------------------|-------------------------------------------------------|--------------------------------------------|
//! | **Capture path**   | Non-blocking scan intake and event publication.       | [`Bridge`], [`BridgeConfig`]               |
//! | **Cloud delivery** | Async put with V1/V2 wire formats and bootstrap.      | [`ScanStore`], [`CloudClient`]             |
//! | **Bootstrap**      | Self-configuration from a sentinel-marked document.   | [`decode_bootstrap`], [`ConnectionConfig`] |
//! | **Fan-out**        | Concurrent subscriber set with self-removal.          | [`SubscriberRegistry`], [`SubscriberHandle`] |
//! | **Consumer side**  | One self-healing subscription per consumer.           | [`SubscriptionClient`], [`ChannelFactory`] |
//! | **Errors**         | Typed errors folded into outcomes and transitions.    | [`DeliveryError`], [`SubscribeError`]      |
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use scanrelay::{Bridge, BridgeConfig, LogObserver, ScanRecord, Verdict};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = Bridge::new(BridgeConfig::new("scanrelay-config.json"))?;
//!
//!     // Local observer: logs every scan and delivery result.
//!     bridge.subscribe(Arc::new(LogObserver)).await;
//!
//!     // The scanner driver hands records in; nothing here blocks on I/O.
//!     let record = ScanRecord::new(
//!         "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
//!         "L898902C36UTO7408122F1204159ZE184226B<<<<<10",
//!         Verdict::Valid,
//!     )
//!     .with_surname("ERIKSSON");
//!     let outcome = bridge.handle_scan(record).await?;
//!     println!("{outcome}");
//!
//!     bridge.shutdown().await;
//!     Ok(())
//! }
//! ```

mod client;
mod cloud;
mod config;
mod core;
mod error;
mod events;
mod scan;
mod subscribers;

// ---- Public re-exports ----

pub use client::{
    ChannelFactory, ScannerChannel, SubscriptionClient, SubscriptionState, DEFAULT_RETRY_INTERVAL,
};
pub use cloud::{CloudClient, DeliveryOutcome, ScanStore, WireProtocol};
pub use config::{
    decode_bootstrap, is_bootstrap, BootstrapData, ConfigStore, ConnectionConfig, HttpUrlResolver,
    ResolveUrl,
};
pub use core::{Bridge, BridgeConfig};
pub use error::{DecodeError, DeliveryError, SubscribeError};
pub use events::{BridgeEvent, BridgeEventKind, Bus};
pub use scan::{ScanRecord, SourceEvent, SourceEventKind, Verdict};
pub use subscribers::{
    HandleId, LogObserver, ScanObserver, SubscriberHandle, SubscriberRegistry,
};
