//! # Remote observer callback contract.
//!
//! `ScanObserver` is the outbound face of one subscriber: two one-way
//! calls, mirrored on the consumer side by whatever transport carries them.
//! Implementations over a real transport map their connection faults to
//! `Err(SubscribeError)` and may expose the channel's own fault signal.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SubscribeError;
use crate::scan::Verdict;

/// Contract for one remote observer's callback channel.
///
/// Both calls are one-way from the broker's perspective: the broker only
/// cares whether the transport accepted them. A returned error marks the
/// channel broken and drops the subscriber from the registry.
#[async_trait]
pub trait ScanObserver: Send + Sync + 'static {
    /// Notifies the observer that a document was scanned.
    async fn on_scan(&self, verdict: Verdict, contents: String) -> Result<(), SubscribeError>;

    /// Notifies the observer of the cloud delivery result.
    async fn on_delivery(&self, delivered: bool, response: String) -> Result<(), SubscribeError>;

    /// Fault signal of the underlying channel, when the transport exposes
    /// one. Fires at most once, when the channel reports closed or faulted.
    fn fault_signal(&self) -> Option<CancellationToken> {
        None
    }

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
