//! # Cloud delivery client.
//!
//! [`CloudClient`] executes one put per call against the configured
//! endpoint. Per attempt it loads the persisted [`ConnectionConfig`]; when
//! none exists and the scan is a bootstrap document it decodes, resolves
//! and persists the config first, then delivers. When none exists and the
//! scan carries customer data the attempt fails fast — delivery is never
//! retried from here.
//!
//! ## Rules
//! - [`CloudClient::put`] is infallible by signature: every error becomes a
//!   `Failed` outcome. A delivery must never crash its caller.
//! - Bootstrap decoding is only attempted while no config is persisted; a
//!   persisted config is authoritative.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cloud::{put_body, DeliveryOutcome};
use crate::config::{decode_bootstrap, is_bootstrap, ConfigStore, ConnectionConfig, ResolveUrl};
use crate::error::DeliveryError;
use crate::scan::ScanRecord;

/// Per-call HTTP wrapper around the cloud put endpoint.
pub struct CloudClient {
    config_store: ConfigStore,
    resolver: Arc<dyn ResolveUrl>,
    http: reqwest::Client,
}

impl CloudClient {
    /// Creates a client with a default HTTP client.
    pub fn new(config_store: ConfigStore, resolver: Arc<dyn ResolveUrl>) -> Self {
        Self::with_http(config_store, resolver, reqwest::Client::new())
    }

    /// Creates a client over a preconfigured HTTP client (timeouts etc.).
    pub fn with_http(
        config_store: ConfigStore,
        resolver: Arc<dyn ResolveUrl>,
        http: reqwest::Client,
    ) -> Self {
        debug!(path = %config_store.path().display(), "cloud client constructed");
        Self {
            config_store,
            resolver,
            http,
        }
    }

    /// Delivers one scan to the cloud store.
    ///
    /// Always resolves to an outcome; failures are folded in, never thrown.
    pub async fn put(&self, record: &ScanRecord) -> DeliveryOutcome {
        match self.try_put(record).await {
            Ok(response) => DeliveryOutcome::delivered(response),
            Err(err) => {
                warn!(label = err.as_label(), error = %err, "scan delivery failed");
                DeliveryOutcome::from(err)
            }
        }
    }

    async fn try_put(&self, record: &ScanRecord) -> Result<String, DeliveryError> {
        let config = self.load_or_bootstrap(record).await?;
        let body = put_body(config.protocol(), &config, record);

        debug!(url = %config.base_url, protocol = ?config.protocol(), "put code line data");
        let response = self
            .http
            .post(&config.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }

    /// Loads the persisted config, bootstrapping it from the current scan
    /// when absent and possible.
    async fn load_or_bootstrap(
        &self,
        record: &ScanRecord,
    ) -> Result<ConnectionConfig, DeliveryError> {
        if let Some(config) = self.config_store.load().await? {
            return Ok(config);
        }
        if !is_bootstrap(record) {
            return Err(DeliveryError::ConfigMissing {
                path: self.config_store.path().to_path_buf(),
            });
        }

        let data = decode_bootstrap(record)?;
        let base_url = self.resolver.resolve(&data.short_url).await?;
        let config = ConnectionConfig {
            base_url,
            client_id: data.client_id,
            access_key: data.access_key,
            protocol_version: data.protocol_version,
        };
        self.config_store.save(&config).await?;
        info!(url = %config.base_url, "connection config bootstrapped from scan");
        Ok(config)
    }
}
