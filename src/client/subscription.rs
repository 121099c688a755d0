//! # Self-healing broker subscription.
//!
//! [`SubscriptionClient`] maintains exactly one outbound subscription and
//! recovers it after every transport failure with a fixed-interval one-shot
//! timer. Consumers see nothing of this beyond a quiet gap in
//! notifications while the broker is away.
//!
//! ## Rules
//! - Fault hooks are re-registered on **every** connect attempt; a fresh
//!   channel gets a fresh watcher.
//! - On every transition into Faulted the stale channel is **aborted**, not
//!   gracefully closed — it is already broken, and a close handshake would
//!   fault a second time.
//! - At most one retry timer is armed at any moment (armed-flag guard);
//!   the timer is one-shot and re-armed only by the next fault.
//! - A fault signal from a channel that has already been replaced aborts
//!   that stale channel and nothing else.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{ChannelFactory, ScannerChannel};
use crate::subscribers::ScanObserver;

/// Fixed interval between reconnect attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(5000);

/// Connection states of the subscription client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Initial state; nothing attempted yet.
    Disconnected,
    /// A connect sequence is in flight.
    Connecting,
    /// The remote subscribe call succeeded; callbacks are flowing.
    Subscribed,
    /// The channel broke; a reconnect is (or is about to be) scheduled.
    Faulted,
}

/// Maintains one outbound subscription with automatic reconnect.
pub struct SubscriptionClient {
    factory: Arc<dyn ChannelFactory>,
    observer: Arc<dyn ScanObserver>,
    retry_interval: Duration,
    state: Mutex<SubscriptionState>,
    channel: Mutex<Option<Arc<dyn ScannerChannel>>>,
    retry_armed: AtomicBool,
    runtime_token: CancellationToken,
}

impl SubscriptionClient {
    /// Creates a client with the default 5-second retry interval.
    pub fn new(factory: Arc<dyn ChannelFactory>, observer: Arc<dyn ScanObserver>) -> Arc<Self> {
        Self::with_retry_interval(factory, observer, DEFAULT_RETRY_INTERVAL)
    }

    /// Creates a client with a custom retry interval.
    pub fn with_retry_interval(
        factory: Arc<dyn ChannelFactory>,
        observer: Arc<dyn ScanObserver>,
        retry_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            factory,
            observer,
            retry_interval,
            state: Mutex::new(SubscriptionState::Disconnected),
            channel: Mutex::new(None),
            retry_armed: AtomicBool::new(false),
            runtime_token: CancellationToken::new(),
        })
    }

    /// Current state of the subscription.
    pub async fn state(&self) -> SubscriptionState {
        *self.state.lock().await
    }

    /// Starts the subscription; returns once the first attempt resolves.
    ///
    /// A failed first attempt is not an error — the client has already
    /// scheduled its reconnect by the time this returns.
    pub async fn activate(self: &Arc<Self>) {
        info!("activating scanner subscription");
        self.connect().await;
    }

    /// Gracefully ends the subscription and stops future retries.
    pub async fn deactivate(&self) {
        self.runtime_token.cancel();
        let channel = self.channel.lock().await.take();
        if let Some(channel) = channel {
            if let Err(err) = channel.unsubscribe().await {
                debug!(error = %err, "unsubscribe failed during deactivate");
            }
        }
        self.set_state(SubscriptionState::Disconnected).await;
        info!("subscription deactivated");
    }

    /// One connect sequence: fresh channel, fresh fault hook, subscribe.
    async fn connect(self: &Arc<Self>) {
        if self.runtime_token.is_cancelled() {
            return;
        }
        self.set_state(SubscriptionState::Connecting).await;
        debug!("connecting hardware subscription");

        match self.factory.connect(Arc::clone(&self.observer)).await {
            Ok(channel) => {
                self.watch_fault(&channel);
                *self.channel.lock().await = Some(Arc::clone(&channel));
                match channel.subscribe().await {
                    Ok(()) => {
                        self.set_state(SubscriptionState::Subscribed).await;
                        info!("subscribed to scanner broker");
                    }
                    Err(err) => {
                        warn!(error = %err, "subscribe call failed");
                        self.fault(Some(channel)).await;
                    }
                }
            }
            Err(err) => {
                debug!(error = %err, "broker not ready to receive subscriptions");
                self.fault(None).await;
            }
        }
    }

    /// Watches one channel's fault signal until it fires or the client
    /// shuts down.
    fn watch_fault(self: &Arc<Self>, channel: &Arc<dyn ScannerChannel>) {
        let me = Arc::clone(self);
        let signal = channel.fault_signal();
        let channel = Arc::clone(channel);
        let token = self.runtime_token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = signal.cancelled() => {
                    debug!("subscription channel faulted");
                    me.fault(Some(channel)).await;
                }
                _ = token.cancelled() => {}
            }
        });
    }

    /// Transition into Faulted: discard the broken channel, arm one retry.
    ///
    /// `source` is the channel whose fault triggered the transition (absent
    /// when connect itself failed). A source that no longer matches the
    /// current channel is stale — it is aborted and nothing else happens.
    async fn fault(self: &Arc<Self>, source: Option<Arc<dyn ScannerChannel>>) {
        {
            let mut current = self.channel.lock().await;
            if let (Some(cur), Some(src)) = (current.as_ref(), source.as_ref()) {
                if !Arc::ptr_eq(cur, src) {
                    src.abort();
                    return;
                }
            }
            if let Some(stale) = current.take() {
                stale.abort();
            } else if let Some(src) = source {
                src.abort();
            }
        }
        self.set_state(SubscriptionState::Faulted).await;
        info!("subscription channel has become faulted");
        self.schedule_retry();
    }

    /// Arms the one-shot reconnect timer; no-op when one is pending.
    fn schedule_retry(self: &Arc<Self>) {
        if self.runtime_token.is_cancelled() {
            return;
        }
        if self.retry_armed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!(interval = ?self.retry_interval, "reconnect scheduled");

        let me = Arc::clone(self);
        tokio::spawn(async move {
            let token = me.runtime_token.clone();
            tokio::select! {
                _ = tokio::time::sleep(me.retry_interval) => {
                    me.retry_armed.store(false, Ordering::SeqCst);
                    me.connect().await;
                }
                _ = token.cancelled() => {
                    me.retry_armed.store(false, Ordering::SeqCst);
                }
            }
        });
    }

    async fn set_state(&self, next: SubscriptionState) {
        let mut state = self.state.lock().await;
        if *state != next {
            debug!(from = ?*state, to = ?next, "subscription state transition");
            *state = next;
        }
    }
}
