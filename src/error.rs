//! Error types used by the delivery and subscription paths.
//!
//! This module defines three error enums:
//!
//! - [`DecodeError`] — failures while decoding a bootstrap document.
//! - [`DeliveryError`] — failures while pushing a scan to the cloud store.
//! - [`SubscribeError`] — failures on the subscriber transport.
//!
//! None of these escape the async unit that produced them: a delivery error
//! becomes a `Failed` [`DeliveryOutcome`](crate::DeliveryOutcome), a
//! subscriber error becomes a liveness transition or a scheduled retry.

use std::path::PathBuf;
use thiserror::Error;

/// # Errors produced while decoding a bootstrap document.
///
/// A malformed letter pair inside the encoded URL is *not* an error — the
/// pair is skipped and decoding continues.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The record is not a bootstrap document (wrong sentinel or verdict).
    #[error("not a bootstrap document")]
    NotBootstrap,

    /// Code line 2 is too short to carry the fixed-offset fields.
    #[error("code line 2 too short ({len} chars, need {need})")]
    Truncated {
        /// Observed length of line 2.
        len: usize,
        /// Minimum length required by the field layout.
        need: usize,
    },
}

/// # Errors produced by a cloud delivery attempt.
///
/// These never propagate past [`CloudClient::put`](crate::CloudClient::put);
/// the client folds them into a failure outcome.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// No persisted connection config and the scan is not a bootstrap
    /// document. The attempt fails fast and is not retried.
    #[error("no connection config at [{path}] and scan is not a bootstrap document")]
    ConfigMissing {
        /// Path where the config was expected.
        path: PathBuf,
    },

    /// The scan looked like a bootstrap document but could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The persisted config could not be read or written.
    #[error("config store: {0}")]
    ConfigStore(String),

    /// Network-level failure reaching the cloud endpoint or the resolver.
    #[error("transport: {0}")]
    Transport(String),

    /// The cloud endpoint answered with a non-success status.
    #[error("endpoint returned status {status}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
    },
}

impl DeliveryError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::ConfigMissing { .. } => "config_missing",
            DeliveryError::Decode(_) => "decode_failed",
            DeliveryError::ConfigStore(_) => "config_store",
            DeliveryError::Transport(_) => "transport",
            DeliveryError::Status { .. } => "status",
        }
    }
}

/// # Errors produced by the subscriber transport.
///
/// On the broker side these flip a handle's liveness; on the consumer side
/// they drive the reconnect state machine.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubscribeError {
    /// The broker endpoint is not reachable (service not running yet).
    #[error("endpoint not found: {0}")]
    EndpointNotFound(String),

    /// Any other transport failure during a subscribe or callback call.
    #[error("subscriber transport: {0}")]
    Transport(String),
}

impl SubscribeError {
    /// Returns true for the endpoint-not-found class of connect failures.
    pub fn is_endpoint_not_found(&self) -> bool {
        matches!(self, SubscribeError::EndpointNotFound(_))
    }
}
