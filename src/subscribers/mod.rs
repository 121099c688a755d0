//! # Subscriber fan-out: observers, handles and the registry.
//!
//! ## Architecture
//! ```text
//! Bus ──► SubscriberRegistry::spawn_listener
//!               │ snapshot of members
//!               ├──► SubscriberHandle 1 ──spawn──► observer1.on_scan / on_delivery
//!               ├──► SubscriberHandle 2 ──spawn──► observer2.on_scan / on_delivery
//!               └──► SubscriberHandle N           (transport error → liveness false
//!                                                  → closed token → self-removal)
//! ```
//!
//! ## Rules
//! - **Isolation**: each notification runs in its own task; one failing
//!   observer never blocks or breaks the others.
//! - **Liveness**: a handle transitions live → not-live exactly once; the
//!   transition fires its closed token, which the registry uses to remove
//!   the handle without external intervention.
//! - **Dedup**: membership is keyed by the identity of the underlying
//!   channel; re-adding the same channel is a no-op.

mod handle;
mod log;
mod observer;
mod registry;

pub use handle::{HandleId, SubscriberHandle};
pub use log::LogObserver;
pub use observer::ScanObserver;
pub use registry::SubscriberRegistry;
