//! # Consumer-side transport contracts.
//!
//! A concrete transport (named pipe, socket, whatever carries the callback
//! interface) implements these two traits. The subscription client only
//! ever talks to the seams, which keeps the reconnect state machine
//! testable without a real broker.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SubscribeError;
use crate::subscribers::ScanObserver;

/// One live session-oriented channel to the broker.
#[async_trait]
pub trait ScannerChannel: Send + Sync + 'static {
    /// Registers this consumer's observer with the broker.
    async fn subscribe(&self) -> Result<(), SubscribeError>;

    /// Gracefully withdraws the subscription.
    async fn unsubscribe(&self) -> Result<(), SubscribeError>;

    /// Fires when the channel reports closed or faulted. At most once.
    fn fault_signal(&self) -> CancellationToken;

    /// Hard-drops a broken channel without a graceful close handshake.
    ///
    /// Called on the reconnect path, where the channel is already known to
    /// be unusable and a graceful close would fault again.
    fn abort(&self);
}

/// Creates channels whose inbound callbacks are routed to an observer.
#[async_trait]
pub trait ChannelFactory: Send + Sync + 'static {
    /// Connects a fresh channel to the broker.
    ///
    /// An unreachable broker is reported as
    /// [`SubscribeError::EndpointNotFound`].
    async fn connect(
        &self,
        observer: Arc<dyn ScanObserver>,
    ) -> Result<Arc<dyn ScannerChannel>, SubscribeError>;
}
