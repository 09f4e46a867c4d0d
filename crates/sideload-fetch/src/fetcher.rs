//! Streaming fetcher implementation.

use crate::http::{HttpBackend, ReqwestBackend};
use async_trait::async_trait;
use futures_util::StreamExt;
use sideload_core::{
    ArchiveFetcherPort, FetchError, FetchResult, Progress, ProgressFn, ProgressThrottle,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use url::Url;

/// Downloads archives over HTTP, streaming chunks straight into the
/// caller's sink.
///
/// The fetcher never buffers a whole body in memory and never leaves a
/// partial file behind: [`ArchiveFetcherPort::fetch_archive`] stages the
/// transfer in a temporary file next to the destination and renames it
/// into place only after the last chunk landed.
pub struct HttpFetcher {
    backend: Arc<dyn HttpBackend>,
}

impl HttpFetcher {
    /// Create a fetcher backed by the production HTTP client.
    pub fn new() -> Self {
        Self::with_backend(Arc::new(ReqwestBackend::new()))
    }

    /// Create a fetcher with a custom transport backend.
    pub fn with_backend(backend: Arc<dyn HttpBackend>) -> Self {
        Self { backend }
    }

    /// Pull the body of `url` into `sink`, chunk by chunk.
    ///
    /// The status code is inspected before any part of the body is
    /// consumed, so a non-2xx response writes nothing to the sink.
    async fn stream_to_sink(
        &self,
        url: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        progress: Option<ProgressFn>,
    ) -> FetchResult<u64> {
        let parsed = Url::parse(url)
            .map_err(|err| FetchError::transport(format!("invalid URL {url:?}: {err}")))?;

        let mut download = self.backend.get(&parsed).await?;
        if !download.is_success() {
            return Err(FetchError::bad_status(download.status));
        }

        let total = download.content_length;
        let mut throttle = ProgressThrottle::default();
        let mut bytes_done: u64 = 0;

        // First report always fires, so listeners see the declared size
        // before the first chunk.
        report(progress.as_ref(), &mut throttle, Progress::new(0, total));

        while let Some(chunk) = download.body.next().await {
            let chunk = chunk?;
            sink.write_all(&chunk)
                .await
                .map_err(|err| FetchError::sink(&err))?;
            bytes_done += chunk.len() as u64;
            report(
                progress.as_ref(),
                &mut throttle,
                Progress::new(bytes_done, total),
            );
        }

        sink.flush().await.map_err(|err| FetchError::sink(&err))?;

        // The final update skips the throttle so the last reported count
        // is always the full transfer size.
        if let Some(callback) = progress.as_ref() {
            callback(Progress::new(bytes_done, total));
        }

        Ok(bytes_done)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn report(progress: Option<&ProgressFn>, throttle: &mut ProgressThrottle, snapshot: Progress) {
    if let Some(callback) = progress {
        if throttle.should_emit() {
            callback(snapshot);
        }
    }
}

#[async_trait]
impl ArchiveFetcherPort for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        progress: Option<ProgressFn>,
    ) -> FetchResult<u64> {
        self.stream_to_sink(url, sink, progress).await
    }

    async fn fetch_archive(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<ProgressFn>,
    ) -> FetchResult<u64> {
        let parent = dest.parent().ok_or_else(|| FetchError::Sink {
            kind: "InvalidInput".to_string(),
            message: format!("destination {} has no parent directory", dest.display()),
        })?;

        // Staged in the destination directory so the final rename cannot
        // cross a filesystem boundary. Dropping the guard on any failure
        // path removes the partial file.
        let staging = NamedTempFile::new_in(parent).map_err(|err| FetchError::sink(&err))?;
        let reopened = staging.reopen().map_err(|err| FetchError::sink(&err))?;
        let mut file = tokio::fs::File::from_std(reopened);

        let bytes_done = self.stream_to_sink(url, &mut file, progress).await?;

        drop(file);
        staging
            .persist(dest)
            .map_err(|err| FetchError::sink(&err.error))?;

        Ok(bytes_done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use crate::http::HttpDownload;
    use bytes::Bytes;
    use futures_util::stream;
    use std::sync::Mutex;
    use std::time::Duration;

    fn fetcher_with(backend: FakeBackend) -> HttpFetcher {
        HttpFetcher::with_backend(Arc::new(backend))
    }

    fn capture_progress() -> (ProgressFn, Arc<Mutex<Vec<Progress>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressFn = Arc::new(move |progress| {
            sink.lock().unwrap().push(progress);
        });
        (callback, seen)
    }

    /// Serves one chunk, then stalls until the caller gives up.
    struct StallingBackend;

    #[async_trait]
    impl HttpBackend for StallingBackend {
        async fn get(&self, _url: &Url) -> FetchResult<HttpDownload> {
            let body = stream::iter(vec![Ok(Bytes::from_static(b"partial "))])
                .chain(stream::pending())
                .boxed();
            Ok(HttpDownload {
                status: 200,
                content_length: Some(64),
                body,
            })
        }
    }

    #[tokio::test]
    async fn fetch_streams_body_into_sink() {
        let fetcher = fetcher_with(
            FakeBackend::new().with_response("a.jar", CannedResponse::ok(b"jar bytes")),
        );

        let mut sink = Vec::new();
        let count = fetcher
            .fetch("https://example.com/a.jar", &mut sink, None)
            .await
            .unwrap();

        assert_eq!(count, 9);
        assert_eq!(sink, b"jar bytes");
    }

    #[tokio::test]
    async fn fetch_concatenates_chunks_in_order() {
        let fetcher = fetcher_with(FakeBackend::new().with_response(
            "big.jar",
            CannedResponse::ok_chunked(vec![b"one ", b"two ", b"three"]),
        ));

        let mut sink = Vec::new();
        let count = fetcher
            .fetch("https://example.com/big.jar", &mut sink, None)
            .await
            .unwrap();

        assert_eq!(count, 13);
        assert_eq!(sink, b"one two three");
    }

    #[tokio::test]
    async fn non_success_status_writes_nothing() {
        let fetcher =
            fetcher_with(FakeBackend::new().with_response("gone.jar", CannedResponse::status(404)));

        let mut sink = Vec::new();
        let err = fetcher
            .fetch("https://example.com/gone.jar", &mut sink, None)
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::BadStatus { code: 404 });
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_mid_body_is_reported() {
        let fetcher = fetcher_with(
            FakeBackend::new().with_response("flaky.jar", CannedResponse::interrupted(b"par")),
        );

        let mut sink = Vec::new();
        let err = fetcher
            .fetch("https://example.com/flaky.jar", &mut sink, None)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn invalid_url_is_a_transport_error() {
        let fetcher = fetcher_with(FakeBackend::new());

        let mut sink = Vec::new();
        let err = fetcher.fetch("not a url", &mut sink, None).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn progress_starts_at_zero_and_ends_at_total() {
        let fetcher = fetcher_with(
            FakeBackend::new().with_response("a.jar", CannedResponse::ok(b"0123456789")),
        );
        let (callback, seen) = capture_progress();

        let mut sink = Vec::new();
        fetcher
            .fetch("https://example.com/a.jar", &mut sink, Some(callback))
            .await
            .unwrap();

        let updates = seen.lock().unwrap();
        let first = updates.first().copied().unwrap();
        let last = updates.last().copied().unwrap();
        assert_eq!(first, Progress::new(0, Some(10)));
        assert_eq!(last, Progress::new(10, Some(10)));
        assert!(last.is_complete());
    }

    #[tokio::test]
    async fn progress_total_is_unknown_without_content_length() {
        let fetcher = fetcher_with(
            FakeBackend::new()
                .with_response("a.jar", CannedResponse::ok_chunked(vec![b"ab", b"cd"])),
        );
        let (callback, seen) = capture_progress();

        let mut sink = Vec::new();
        let count = fetcher
            .fetch("https://example.com/a.jar", &mut sink, Some(callback))
            .await
            .unwrap();

        assert_eq!(count, 4);
        let updates = seen.lock().unwrap();
        assert!(updates.iter().all(|p| p.bytes_total.is_none()));
        assert_eq!(updates.last().copied().unwrap().bytes_done, 4);
    }

    #[tokio::test]
    async fn fetch_archive_places_complete_file() {
        let fetcher = fetcher_with(
            FakeBackend::new().with_response("a.jar", CannedResponse::ok(b"jar bytes")),
        );
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.jar");

        let count = fetcher
            .fetch_archive("https://example.com/a.jar", &dest, None)
            .await
            .unwrap();

        assert_eq!(count, 9);
        assert_eq!(std::fs::read(&dest).unwrap(), b"jar bytes");
    }

    #[tokio::test]
    async fn fetch_archive_leaves_nothing_on_bad_status() {
        let fetcher =
            fetcher_with(FakeBackend::new().with_response("gone.jar", CannedResponse::status(404)));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("gone.jar");

        let err = fetcher
            .fetch_archive("https://example.com/gone.jar", &dest, None)
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::BadStatus { code: 404 });
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn fetch_archive_discards_partial_transfer() {
        let fetcher = fetcher_with(
            FakeBackend::new().with_response("flaky.jar", CannedResponse::interrupted(b"par")),
        );
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("flaky.jar");

        let err = fetcher
            .fetch_archive("https://example.com/flaky.jar", &dest, None)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn fetch_archive_dropped_mid_transfer_leaves_nothing() {
        let fetcher = HttpFetcher::with_backend(Arc::new(StallingBackend));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("stalled.jar");

        // Timing out drops the in-flight future, which must take its
        // staging file with it.
        let fetch = fetcher.fetch_archive("https://example.com/stalled.jar", &dest, None);
        let outcome = tokio::time::timeout(Duration::from_millis(100), fetch).await;
        assert!(outcome.is_err());

        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn fetch_archive_overwrites_existing_file() {
        let fetcher = fetcher_with(
            FakeBackend::new().with_response("a.jar", CannedResponse::ok(b"fresh")),
        );
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.jar");
        std::fs::write(&dest, b"stale contents").unwrap();

        fetcher
            .fetch_archive("https://example.com/a.jar", &dest, None)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"fresh");
    }
}
