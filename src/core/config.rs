//! # Bridge configuration.
//!
//! All runtime knobs live here and are passed into [`Bridge::new`]
//! explicitly — there is no ambient config-file-path lookup anywhere in
//! the crate.
//!
//! ## Field semantics
//! - `config_path`: where the bootstrapped [`ConnectionConfig`] is
//!   persisted and re-read; absence of the file is the normal pre-bootstrap
//!   state.
//! - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus).
//! - `http_timeout`: per-request timeout for cloud puts.
//!
//! [`Bridge::new`]: crate::Bridge::new
//! [`ConnectionConfig`]: crate::ConnectionConfig

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the bridge.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Path of the persisted connection config.
    pub config_path: PathBuf,
    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
    /// Timeout applied to each cloud put request.
    pub http_timeout: Duration,
}

impl BridgeConfig {
    /// Creates a configuration with defaults for everything but the path:
    ///
    /// - `bus_capacity = 1024`
    /// - `http_timeout = 30s`
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            bus_capacity: 1024,
            http_timeout: Duration::from_secs(30),
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}
