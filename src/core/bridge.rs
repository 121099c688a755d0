//! # Bridge: wires capture, delivery and fan-out.
//!
//! The [`Bridge`] owns the event bus, the [`ScanStore`] and the
//! [`SubscriberRegistry`]. One instance runs per scanner host process.
//!
//! ## High-level architecture
//! ```text
//! scanner driver ──► handle_source_event(event)
//!                         └─ data ──► handle_scan(record)
//!                                          ├─ publish ScanDetected ───► Bus
//!                                          └─ ScanStore::put_async
//!                                                 └─ publish DeliveryCompleted ─► Bus
//!
//! Bus ──► registry listener ──► fan-out to every live SubscriberHandle
//!
//! subscribe(observer) ──► SubscriberHandle ──► registry (self-removing)
//! shutdown() ──► cancel listener, dispose registry (in-flight calls not awaited)
//! ```
//!
//! ## Rules
//! - `handle_scan` never blocks on network I/O: it publishes and schedules,
//!   then returns.
//! - For a single scan the scan-detected fan-out is scheduled before the
//!   delivery-result fan-out; what order two *different* subscribers see
//!   the two notifications in is not guaranteed.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cloud::{CloudClient, DeliveryOutcome, ScanStore};
use crate::config::{ConfigStore, HttpUrlResolver};
use crate::core::BridgeConfig;
use crate::error::DeliveryError;
use crate::events::{BridgeEvent, Bus};
use crate::scan::{ScanRecord, SourceEvent};
use crate::subscribers::{ScanObserver, SubscriberHandle, SubscriberRegistry};

/// Coordinates scan capture, cloud delivery and subscriber notification.
pub struct Bridge {
    bus: Bus,
    store: ScanStore,
    registry: Arc<SubscriberRegistry>,
    runtime_token: CancellationToken,
}

impl Bridge {
    /// Builds a bridge from explicit configuration.
    pub fn new(cfg: BridgeConfig) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.http_timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let client = CloudClient::with_http(
            ConfigStore::new(&cfg.config_path),
            Arc::new(HttpUrlResolver::new()?),
            http,
        );
        Self::with_client(cfg, client)
    }

    /// Builds a bridge over a preassembled delivery client.
    pub fn with_client(cfg: BridgeConfig, client: CloudClient) -> Result<Self, DeliveryError> {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let store = ScanStore::new(client, bus.clone());
        let registry = SubscriberRegistry::new();
        let runtime_token = CancellationToken::new();
        registry.spawn_listener(&bus, runtime_token.clone());

        info!(config = %cfg.config_path.display(), "bridge constructed");
        Ok(Self {
            bus,
            store,
            registry,
            runtime_token,
        })
    }

    /// Capture entry point: schedules both fan-outs and the cloud put,
    /// then returns immediately.
    ///
    /// The handle resolves to the delivery outcome; dropping it loses
    /// nothing, since the outcome is also published on the bus.
    pub fn handle_scan(&self, record: ScanRecord) -> JoinHandle<DeliveryOutcome> {
        debug!(record = %record, "scan captured");
        self.bus.publish(BridgeEvent::scan_detected(record.clone()));
        self.store.put_async(record)
    }

    /// Routes one raw scanner driver event.
    ///
    /// Data events feed [`Bridge::handle_scan`]; device and error events
    /// are logged and dropped.
    pub fn handle_source_event(&self, event: SourceEvent) -> Option<JoinHandle<DeliveryOutcome>> {
        if event.is_error() {
            warn!(code = ?event.code(), message = ?event.message(), "scanner error event");
            return None;
        }
        if event.is_device() {
            info!(code = ?event.code(), "scanner device event");
            return None;
        }
        event.into_record().map(|record| self.handle_scan(record))
    }

    /// Registers a remote observer and returns its handle.
    pub async fn subscribe(&self, observer: Arc<dyn ScanObserver>) -> Arc<SubscriberHandle> {
        let handle = SubscriberHandle::new(observer);
        self.registry.add(Arc::clone(&handle)).await;
        handle
    }

    /// Withdraws a subscription explicitly.
    pub async fn unsubscribe(&self, handle: &Arc<SubscriberHandle>) {
        self.registry.remove(handle.id()).await;
    }

    /// The bridge's event bus, for in-process observers.
    #[inline]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The subscriber registry.
    #[inline]
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Stops scheduling new fan-outs and clears membership.
    ///
    /// In-flight notification and delivery tasks are not awaited; they run
    /// to completion on the worker pool.
    pub async fn shutdown(&self) {
        info!("bridge shutting down");
        self.runtime_token.cancel();
        self.registry.dispose().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectionConfig, ResolveUrl};
    use crate::error::SubscribeError;
    use crate::scan::Verdict;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct NoResolver;

    #[async_trait]
    impl ResolveUrl for NoResolver {
        async fn resolve(&self, short_url: &str) -> Result<String, DeliveryError> {
            Ok(short_url.to_string())
        }
    }

    struct CountingObserver {
        scans: AtomicUsize,
        deliveries: AtomicUsize,
    }

    impl CountingObserver {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                scans: AtomicUsize::new(0),
                deliveries: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ScanObserver for CountingObserver {
        async fn on_scan(&self, _v: Verdict, _c: String) -> Result<(), SubscribeError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn on_delivery(&self, _ok: bool, _r: String) -> Result<(), SubscribeError> {
            self.deliveries.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn bridge_with_endpoint(base_url: &str) -> (Bridge, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_store = ConfigStore::new(dir.path().join("config.json"));
        config_store
            .save(&ConnectionConfig {
                base_url: base_url.into(),
                client_id: "CLIENT00XYZ".into(),
                access_key: "AK1234567".into(),
                protocol_version: "02".into(),
            })
            .await
            .expect("save");

        let cfg = BridgeConfig::new(dir.path().join("config.json"));
        let client = CloudClient::new(config_store, Arc::new(NoResolver));
        let bridge = Bridge::with_client(cfg, client).expect("bridge");
        (bridge, dir)
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !condition() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("condition within deadline");
    }

    #[tokio::test]
    async fn test_scan_flows_to_cloud_and_every_subscriber() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ack"))
            .mount(&server)
            .await;

        let (bridge, _dir) = bridge_with_endpoint(&server.uri()).await;
        let first = CountingObserver::new();
        let second = CountingObserver::new();
        bridge.subscribe(first.clone()).await;
        bridge.subscribe(second.clone()).await;

        let record = ScanRecord::new("L1", "L2", Verdict::Valid).with_surname("ERIKSSON");
        let outcome = bridge.handle_scan(record).await.expect("join");
        assert!(outcome.is_delivered());

        for observer in [&first, &second] {
            let observer = Arc::clone(observer);
            wait_until(move || {
                observer.scans.load(Ordering::SeqCst) == 1
                    && observer.deliveries.load(Ordering::SeqCst) == 1
            })
            .await;
        }
    }

    #[tokio::test]
    async fn test_source_events_route_only_data_to_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let (bridge, _dir) = bridge_with_endpoint(&server.uri()).await;

        assert!(bridge.handle_source_event(SourceEvent::device(2)).is_none());
        assert!(bridge
            .handle_source_event(SourceEvent::error(-5, None))
            .is_none());

        let data = SourceEvent::data(ScanRecord::new("L1", "L2", Verdict::Valid));
        let handle = bridge.handle_source_event(data).expect("scheduled");
        assert!(handle.await.expect("join").is_delivered());
    }

    #[tokio::test]
    async fn test_shutdown_clears_membership_and_stops_fanout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let (bridge, _dir) = bridge_with_endpoint(&server.uri()).await;
        let observer = CountingObserver::new();
        bridge.subscribe(observer.clone()).await;

        bridge.shutdown().await;
        assert!(bridge.registry().is_empty().await);

        bridge
            .handle_scan(ScanRecord::new("L1", "L2", Verdict::Valid))
            .await
            .expect("join");
        tokio::task::yield_now().await;
        assert_eq!(observer.scans.load(Ordering::SeqCst), 0);
    }
}
