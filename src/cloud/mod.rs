//! Cloud delivery: wire protocol, client, and asynchronous store.
//!
//! ```text
//! Bridge ──► ScanStore::put_async(record)          (capture path, returns at once)
//!                  │ tokio::spawn
//!                  ▼
//!            CloudClient::put(record)
//!                  ├─ ConfigStore::load  ──absent──► bootstrap decode + resolve + save
//!                  ├─ put_body(V1 | V2)
//!                  └─ HTTP POST ──► DeliveryOutcome (success payload or failure text)
//!                        │
//!                        └──► Bus: DeliveryCompleted(outcome)
//! ```
//!
//! Every attempt produces exactly one [`DeliveryOutcome`]; transport errors
//! are folded into a failure outcome, never propagated to the caller.

mod client;
mod outcome;
mod protocol;
mod store;

pub use client::CloudClient;
pub use outcome::DeliveryOutcome;
pub use protocol::WireProtocol;
pub use store::ScanStore;

pub(crate) use protocol::put_body;
