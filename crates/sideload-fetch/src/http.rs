//! HTTP transport backend.
//!
//! The [`HttpBackend`] trait isolates the actual HTTP client so the
//! streaming logic in [`crate::HttpFetcher`] can be tested against canned
//! responses without touching the network. [`ReqwestBackend`] is the real
//! implementation used in production.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use sideload_core::{FetchError, FetchResult};
use std::time::Duration;
use url::Url;

/// Body of an in-flight download, yielded chunk by chunk.
pub type ByteChunkStream = BoxStream<'static, FetchResult<Bytes>>;

/// A response handed back by the transport layer.
///
/// The status is reported as-is; deciding what to do with a non-success
/// code is up to the caller. The body stream must not be consumed when
/// the status indicates failure.
pub struct HttpDownload {
    /// HTTP status code of the response.
    pub status: u16,
    /// Value of the `Content-Length` header, when the server sent one.
    pub content_length: Option<u64>,
    /// The response body as a stream of chunks.
    pub body: ByteChunkStream,
}

impl HttpDownload {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Debug for HttpDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDownload")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Backend trait
// ============================================================================

/// Abstraction over the HTTP client.
///
/// A backend performs a single GET and hands back the response head plus
/// a lazily consumed body stream. It does not retry and it does not
/// interpret status codes.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Issue a GET request for `url`.
    ///
    /// Returns `Ok` whenever a response arrived, regardless of its status
    /// code. Connection-level failures map to [`FetchError::Transport`].
    async fn get(&self, url: &Url) -> FetchResult<HttpDownload>;
}

// ============================================================================
// Reqwest implementation
// ============================================================================

/// Production backend backed by `reqwest`.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a backend with a connection timeout of 30 seconds.
    ///
    /// Only the connect phase is bounded; a total request timeout would
    /// cut off large transfers on slow links.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }
}

impl Default for ReqwestBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get(&self, url: &Url) -> FetchResult<HttpDownload> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|err| FetchError::transport(err.to_string()))?;

        let status = response.status().as_u16();
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map_err(|err| FetchError::transport(err.to_string()))
            .boxed();

        Ok(HttpDownload {
            status,
            content_length,
            body,
        })
    }
}

// ============================================================================
// Test support
// ============================================================================
