//! HTTP client abstraction for testability.
//!
//! The catalog endpoint and the image hosts are plain GET targets, so the
//! trait surface is a single `get`. Injecting the client lets the fetcher,
//! asset cache, and syncer run against mocks in tests.

use std::future::Future;
use thiserror::Error;
use tracing::{trace, warn};

/// Errors from HTTP operations.
///
/// All of these are treated as transient by the callers in this crate:
/// pagination stops early and asset downloads are skipped, never escalated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HttpError {
    /// Request could not be sent or the response body could not be read.
    #[error("request failed: {0}")]
    Transport(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The client itself could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// Trait for asynchronous HTTP GET operations.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;
}

/// Browser User-Agent sent with every request.
///
/// The upstream catalog rejects unidentified clients, so requests carry a
/// realistic browser identification header.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout in seconds.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        trace!(url, "HTTP GET starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url, error = %e, is_timeout = e.is_timeout(), "HTTP request failed");
                return Err(HttpError::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "HTTP error status");
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url, error = %e, "failed to read response body");
                Err(HttpError::Transport(e.to_string()))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockHttpClient;
    use super::*;

    #[tokio::test]
    async fn mock_client_returns_registered_body() {
        let mock = MockHttpClient::new().respond("http://example.com/a", vec![1, 2, 3]);

        let body = mock.get("http://example.com/a").await.unwrap();
        assert_eq!(body, vec![1, 2, 3]);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn mock_client_errors_on_unknown_url() {
        let mock = MockHttpClient::new();

        let result = mock.get("http://example.com/missing").await;
        assert!(matches!(result, Err(HttpError::Transport(_))));
    }

    #[test]
    fn reqwest_client_builds() {
        assert!(ReqwestClient::new().is_ok());
        assert!(ReqwestClient::with_timeout(5).is_ok());
    }
}
