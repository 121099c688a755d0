//! # Subscriber handle: one remote observer with liveness tracking.
//!
//! A handle wraps one observer channel and performs the two outbound
//! notification calls off the capture path. Any transport error — or a
//! panicking observer — flips the handle's liveness to false **exactly
//! once** and fires its closed token; the registry listens on that token to
//! remove the handle. Faults after the first are no-ops, and liveness never
//! transitions back to true: a recovered consumer subscribes afresh.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cloud::DeliveryOutcome;
use crate::scan::ScanRecord;
use crate::subscribers::ScanObserver;

/// Identity of a handle: the address of the underlying observer channel.
///
/// Two handles wrapping the same channel compare equal, which is what the
/// registry keys membership on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandleId(usize);

/// One remote observer with a fire-once liveness flag.
pub struct SubscriberHandle {
    observer: Arc<dyn ScanObserver>,
    live: AtomicBool,
    closed: CancellationToken,
}

impl SubscriberHandle {
    /// Wraps an observer channel.
    ///
    /// When the transport exposes its own fault signal, the handle watches
    /// it and treats a fire like any notification failure.
    pub fn new(observer: Arc<dyn ScanObserver>) -> Arc<Self> {
        let handle = Arc::new(Self {
            observer: Arc::clone(&observer),
            live: AtomicBool::new(true),
            closed: CancellationToken::new(),
        });

        if let Some(fault) = observer.fault_signal() {
            let me = Arc::clone(&handle);
            let closed = handle.closed.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = fault.cancelled() => {
                        debug!(observer = me.observer.name(), "channel fault signal fired");
                        me.mark_closed();
                    }
                    _ = closed.cancelled() => {}
                }
            });
        }
        handle
    }

    /// Identity of the underlying channel.
    #[inline]
    pub fn id(&self) -> HandleId {
        HandleId(Arc::as_ptr(&self.observer) as *const () as usize)
    }

    /// Whether the channel is still usable for outbound calls.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// One-shot closed signal; cancelled exactly once when liveness drops.
    #[inline]
    pub fn closed(&self) -> CancellationToken {
        self.closed.clone()
    }

    /// Flips liveness true → false; only the first call fires the token.
    pub fn mark_closed(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            debug!("subscriber handle closed");
            self.closed.cancel();
        }
    }

    /// Schedules the scan-detected notification; returns immediately.
    pub fn notify_scan(self: &Arc<Self>, record: &ScanRecord) {
        if !self.is_live() {
            return;
        }
        let me = Arc::clone(self);
        let verdict = record.verdict;
        let contents = record.contents().to_string();
        tokio::spawn(async move {
            me.relay("scan", me.observer.on_scan(verdict, contents)).await;
        });
    }

    /// Schedules the delivery-result notification; returns immediately.
    pub fn notify_delivery(self: &Arc<Self>, outcome: &DeliveryOutcome) {
        if !self.is_live() {
            return;
        }
        let me = Arc::clone(self);
        let delivered = outcome.is_delivered();
        let response = outcome.text().to_string();
        tokio::spawn(async move {
            me.relay("delivery", me.observer.on_delivery(delivered, response))
                .await;
        });
    }

    /// Awaits one outbound call, folding transport errors and panics into
    /// the liveness transition.
    async fn relay(
        &self,
        what: &'static str,
        call: impl std::future::Future<Output = Result<(), crate::error::SubscribeError>>,
    ) {
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(
                    observer = self.observer.name(),
                    error = %err,
                    "unable to notify remote subscriber of {what}"
                );
                self.mark_closed();
            }
            Err(_panic) => {
                warn!(
                    observer = self.observer.name(),
                    "observer panicked during {what} notification"
                );
                self.mark_closed();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubscribeError;
    use crate::scan::Verdict;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Notify;

    struct RecordingObserver {
        scans: AtomicUsize,
        deliveries: AtomicUsize,
        notify: Notify,
        fail: bool,
    }

    impl RecordingObserver {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                scans: AtomicUsize::new(0),
                deliveries: AtomicUsize::new(0),
                notify: Notify::new(),
                fail,
            })
        }
    }

    #[async_trait]
    impl ScanObserver for RecordingObserver {
        async fn on_scan(&self, _verdict: Verdict, _contents: String) -> Result<(), SubscribeError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.notify.notify_one();
            if self.fail {
                return Err(SubscribeError::Transport("pipe broken".into()));
            }
            Ok(())
        }

        async fn on_delivery(&self, _ok: bool, _response: String) -> Result<(), SubscribeError> {
            self.deliveries.fetch_add(1, Ordering::SeqCst);
            self.notify.notify_one();
            if self.fail {
                return Err(SubscribeError::Transport("pipe broken".into()));
            }
            Ok(())
        }
    }

    fn record() -> ScanRecord {
        ScanRecord::new("L1", "L2", Verdict::Valid).with_surname("ERIKSSON")
    }

    #[tokio::test]
    async fn test_notifications_reach_a_healthy_observer() {
        let observer = RecordingObserver::new(false);
        let handle = SubscriberHandle::new(observer.clone());

        handle.notify_scan(&record());
        tokio::time::timeout(Duration::from_secs(1), observer.notify.notified())
            .await
            .expect("scan relayed");

        handle.notify_delivery(&DeliveryOutcome::delivered("ok"));
        tokio::time::timeout(Duration::from_secs(1), observer.notify.notified())
            .await
            .expect("delivery relayed");

        assert_eq!(observer.scans.load(Ordering::SeqCst), 1);
        assert_eq!(observer.deliveries.load(Ordering::SeqCst), 1);
        assert!(handle.is_live());
    }

    #[tokio::test]
    async fn test_transport_error_flips_liveness_once() {
        let observer = RecordingObserver::new(true);
        let handle = SubscriberHandle::new(observer.clone());
        let closed = handle.closed();

        handle.notify_scan(&record());
        tokio::time::timeout(Duration::from_secs(1), closed.cancelled())
            .await
            .expect("closed token fired");
        assert!(!handle.is_live());

        // Further faults and notifications are no-ops.
        handle.mark_closed();
        handle.notify_scan(&record());
        handle.notify_delivery(&DeliveryOutcome::failed("x"));
        tokio::task::yield_now().await;
        assert_eq!(observer.scans.load(Ordering::SeqCst), 1);
        assert_eq!(observer.deliveries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_channel_fault_signal_closes_the_handle() {
        struct SignalObserver {
            fault: CancellationToken,
        }

        #[async_trait]
        impl ScanObserver for SignalObserver {
            async fn on_scan(&self, _v: Verdict, _c: String) -> Result<(), SubscribeError> {
                Ok(())
            }
            async fn on_delivery(&self, _ok: bool, _r: String) -> Result<(), SubscribeError> {
                Ok(())
            }
            fn fault_signal(&self) -> Option<CancellationToken> {
                Some(self.fault.clone())
            }
        }

        let fault = CancellationToken::new();
        let handle = SubscriberHandle::new(Arc::new(SignalObserver {
            fault: fault.clone(),
        }));
        assert!(handle.is_live());

        fault.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle.closed().cancelled())
            .await
            .expect("closed via fault signal");
        assert!(!handle.is_live());
    }

    #[tokio::test]
    async fn test_handles_over_same_channel_share_identity() {
        let observer = RecordingObserver::new(false);
        let a = SubscriberHandle::new(observer.clone());
        let b = SubscriberHandle::new(observer);
        assert_eq!(a.id(), b.id());

        let other = RecordingObserver::new(false);
        let c = SubscriberHandle::new(other);
        assert_ne!(a.id(), c.id());
    }
}
