//! # Short-URL resolution.
//!
//! Bootstrap documents encode a short-redirect URL; the real endpoint is
//! whatever that URL redirects to. [`ResolveUrl`] is the seam, and
//! [`HttpUrlResolver`] the production implementation: one HEAD request with
//! redirect auto-follow disabled, taking the `Location` header of a
//! moved-permanently answer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::LOCATION, redirect, StatusCode};
use tracing::debug;

use crate::error::DeliveryError;

/// Timeout applied to the single resolution request.
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves a short-redirect URL to its long form.
#[async_trait]
pub trait ResolveUrl: Send + Sync + 'static {
    /// Performs the single-hop lookup.
    ///
    /// Implementations return the short URL unchanged when the endpoint
    /// does not answer with a redirect.
    async fn resolve(&self, short_url: &str) -> Result<String, DeliveryError>;
}

/// HEAD-redirect resolver over HTTP.
///
/// Redirects are **not** followed automatically — the first hop's target is
/// the answer.
pub struct HttpUrlResolver {
    http: reqwest::Client,
}

impl HttpUrlResolver {
    /// Creates a resolver with its own non-following HTTP client.
    pub fn new() -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(RESOLVE_TIMEOUT)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ResolveUrl for HttpUrlResolver {
    async fn resolve(&self, short_url: &str) -> Result<String, DeliveryError> {
        let response = self
            .http
            .head(short_url)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        if response.status() == StatusCode::MOVED_PERMANENTLY {
            if let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                debug!(short_url, long_url = location, "short url resolved");
                return Ok(location.to_string());
            }
        }
        debug!(short_url, "no redirect answer, keeping short url");
        Ok(short_url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_moved_permanently_yields_location_header() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("Location", "https://cloud.example/put"),
            )
            .mount(&server)
            .await;

        let resolver = HttpUrlResolver::new().expect("resolver");
        let long = resolver.resolve(&server.uri()).await.expect("resolve");
        assert_eq!(long, "https://cloud.example/put");
    }

    #[tokio::test]
    async fn test_non_redirect_answer_keeps_short_url() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let resolver = HttpUrlResolver::new().expect("resolver");
        let long = resolver.resolve(&server.uri()).await.expect("resolve");
        assert_eq!(long, server.uri());
    }
}
