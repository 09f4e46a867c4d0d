//! Archive fetcher port definition.
//!
//! Abstracts the HTTP transfer so queue and cache behavior can be
//! exercised without a network. The production implementation lives in
//! the fetch crate; tests substitute fakes.

use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::errors::FetchResult;
use crate::progress::ProgressFn;

/// Port for transferring the content of one URL.
#[async_trait]
pub trait ArchiveFetcherPort: Send + Sync {
    /// Stream the content of `url` into `sink`, reporting progress.
    ///
    /// Returns the number of bytes transferred. The sink is flushed on
    /// successful completion; on error its content is unspecified and the
    /// caller must discard it.
    async fn fetch(
        &self,
        url: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        progress: Option<ProgressFn>,
    ) -> FetchResult<u64>;

    /// Fetch the content of `url` into a file at `dest`.
    ///
    /// On success `dest` holds the complete content. On any failure no
    /// file exists at `dest` at all - a truncated download must never be
    /// observable there.
    async fn fetch_archive(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<ProgressFn>,
    ) -> FetchResult<u64>;
}
