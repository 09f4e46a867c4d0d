//! Download request items.
//!
//! A `DownloadItem` is immutable once built and consumed from the pending
//! queue exactly once: at enqueue time (skip predicate fired) or after one
//! fetch attempt, successful or not.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::errors::ConfigError;

/// External check deciding whether an item is already available, making
/// the fetch unnecessary. Evaluated once, at enqueue time.
pub type SkipPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// A single requested download.
///
/// The key doubles as the cache filename and as the identifier carried in
/// batch events, so it must be a plain file name: non-empty, no path
/// separators, not a dot component. That keeps every cache entry directly
/// under the cache root.
#[derive(Clone)]
pub struct DownloadItem {
    key: String,
    source_url: String,
    skip: Option<SkipPredicate>,
}

impl DownloadItem {
    /// Create an item with an explicit key.
    pub fn new(
        key: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self {
            key,
            source_url: source_url.into(),
            skip: None,
        })
    }

    /// Create an item whose key is the last path segment of the URL.
    ///
    /// Fails when the URL does not parse, is not HTTP(S), or its path has
    /// no final file name to derive a key from.
    pub fn from_url(source_url: impl Into<String>) -> Result<Self, ConfigError> {
        let source_url = source_url.into();
        let parsed = Url::parse(&source_url).map_err(|e| ConfigError::InvalidSourceUrl {
            url: source_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidSourceUrl {
                url: source_url,
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        let key = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .map(ToOwned::to_owned)
            .ok_or_else(|| ConfigError::InvalidSourceUrl {
                url: source_url.clone(),
                reason: "no file name in URL path".to_string(),
            })?;

        Self::new(key, source_url)
    }

    /// Attach a skip predicate, evaluated at enqueue time.
    #[must_use]
    pub fn with_skip_predicate(mut self, predicate: SkipPredicate) -> Self {
        self.skip = Some(predicate);
        self
    }

    /// The cache filename / event identifier.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The HTTP(S) location to fetch.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Evaluate the skip predicate; `false` when none is attached.
    #[must_use]
    pub fn should_skip(&self) -> bool {
        self.skip.as_ref().is_some_and(|predicate| predicate())
    }
}

impl fmt::Debug for DownloadItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadItem")
            .field("key", &self.key)
            .field("source_url", &self.source_url)
            .field("has_skip_predicate", &self.skip.is_some())
            .finish()
    }
}

fn validate_key(key: &str) -> Result<(), ConfigError> {
    let reject = |reason: &str| ConfigError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.is_empty() {
        return Err(reject("key must not be empty"));
    }
    if key == "." || key == ".." {
        return Err(reject("key must not be a dot component"));
    }
    if key.contains('/') || key.contains('\\') {
        return Err(reject("key must not contain path separators"));
    }
    Ok(())
}
