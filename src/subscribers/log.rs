//! # Logging observer for debugging and demos.
//!
//! [`LogObserver`] is a local, always-healthy subscriber that writes both
//! notifications to the log. Useful while bringing up a deployment: it
//! shows the full scan → delivery round trip without a remote consumer
//! attached.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::SubscribeError;
use crate::scan::Verdict;
use crate::subscribers::ScanObserver;

/// In-process observer that logs scans and delivery results.
pub struct LogObserver;

#[async_trait]
impl ScanObserver for LogObserver {
    async fn on_scan(&self, verdict: Verdict, contents: String) -> Result<(), SubscribeError> {
        info!(?verdict, contents = %contents, "document scanned");
        Ok(())
    }

    async fn on_delivery(&self, delivered: bool, response: String) -> Result<(), SubscribeError> {
        if delivered {
            info!(response = %response, "scan delivered");
        } else {
            warn!(error = %response, "scan delivery failed");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
