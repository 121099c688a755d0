//! # Durable connection configuration.
//!
//! [`ConnectionConfig`] is the persisted record the delivery client reads on
//! every attempt. It is absent until the first valid bootstrap document is
//! seen, written exactly once by the bootstrap path, and replaced wholesale
//! on a rewrite — the file is never patched in place, so readers never see
//! a torn record.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cloud::WireProtocol;
use crate::error::DeliveryError;

/// Persisted cloud connection parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// Resolved endpoint the put request is posted to.
    pub base_url: String,
    /// Client identifier sent with every put.
    pub client_id: String,
    /// Access key sent with every put.
    pub access_key: String,
    /// Protocol version tag; empty selects the V1 wire format.
    #[serde(default)]
    pub protocol_version: String,
}

impl ConnectionConfig {
    /// Wire protocol selected by the persisted version tag.
    #[inline]
    pub fn protocol(&self) -> WireProtocol {
        WireProtocol::from_version_tag(&self.protocol_version)
    }
}

/// File-backed store for [`ConnectionConfig`].
///
/// The path is threaded in explicitly — there is no ambient default
/// location.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted config; `Ok(None)` when none exists yet.
    pub async fn load(&self) -> Result<Option<ConnectionConfig>, DeliveryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| DeliveryError::ConfigStore(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DeliveryError::ConfigStore(e.to_string())),
        }
    }

    /// Persists the config, replacing any previous file wholesale.
    ///
    /// Writes to a sibling temp file and renames over the target so a
    /// concurrent reader sees either the old record or the new one.
    pub async fn save(&self, config: &ConnectionConfig) -> Result<(), DeliveryError> {
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| DeliveryError::ConfigStore(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, text)
            .await
            .map_err(|e| DeliveryError::ConfigStore(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DeliveryError::ConfigStore(e.to_string()))?;

        info!(path = %self.path.display(), "connection config persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ConnectionConfig {
        ConnectionConfig {
            base_url: "https://cloud.example/put".into(),
            client_id: "CLIENT00XYZ".into(),
            access_key: "AK1234567".into(),
            protocol_version: "02".into(),
        }
    }

    #[tokio::test]
    async fn test_absent_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("config.json"));
        assert_eq!(store.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("config.json"));

        let config = sample_config();
        store.save(&config).await.expect("save");
        assert_eq!(store.load().await.expect("load"), Some(config));
    }

    #[tokio::test]
    async fn test_missing_version_tag_defaults_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        tokio::fs::write(
            &path,
            r#"{"baseUrl":"https://x","clientId":"c","accessKey":"k"}"#,
        )
        .await
        .expect("write");

        let store = ConfigStore::new(&path);
        let config = store.load().await.expect("load").expect("some");
        assert_eq!(config.protocol_version, "");
        assert_eq!(config.protocol(), WireProtocol::V1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_config_store_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "not json").await.expect("write");

        let store = ConfigStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(DeliveryError::ConfigStore(_))
        ));
    }
}
