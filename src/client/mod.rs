//! Consumer side: transport contracts and the self-healing subscription.
//!
//! A consumer process holds exactly one outbound subscription to the
//! bridge. [`SubscriptionClient`] owns that subscription and brings it back
//! after every transport failure without user intervention:
//!
//! ```text
//! Disconnected ──activate()──► Connecting ──subscribe ok──► Subscribed
//!                                  │                            │
//!                        connect/subscribe failed        channel faulted
//!                                  ▼                            ▼
//!                               Faulted ◄───────────────────────┘
//!                                  │ one-shot 5 s timer
//!                                  └──────────► Connecting (again)
//! ```
//!
//! The transport itself is out of scope; [`ChannelFactory`] and
//! [`ScannerChannel`] are the seams a concrete transport implements.

mod channel;
mod subscription;

pub use channel::{ChannelFactory, ScannerChannel};
pub use subscription::{SubscriptionClient, SubscriptionState, DEFAULT_RETRY_INTERVAL};
