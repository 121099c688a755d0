//! Cloud connection configuration: bootstrap decoding and persistence.
//!
//! The bridge configures its own cloud endpoint from a specially-marked
//! scanned document instead of an installer setting:
//!
//! ```text
//! bootstrap scan ──► decode_bootstrap() ──► BootstrapData
//!                                              │ short URL
//!                                              ▼
//!                                        ResolveUrl::resolve()   (one HEAD hop)
//!                                              │ long URL
//!                                              ▼
//!                                        ConnectionConfig ──► ConfigStore::save()
//! ```
//!
//! Once persisted the config is authoritative: decoding is only attempted
//! while none exists, and the file is replaced wholesale, never patched.

mod bootstrap;
mod resolver;
mod store;

pub use bootstrap::{decode_bootstrap, is_bootstrap, BootstrapData};
pub use resolver::{HttpUrlResolver, ResolveUrl};
pub use store::{ConfigStore, ConnectionConfig};
