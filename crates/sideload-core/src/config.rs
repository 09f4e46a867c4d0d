//! Batch loader configuration.

use std::path::PathBuf;

/// Configuration consumed by the batch loader at construction.
///
/// Everything is validated when the loader is built and immutable
/// afterwards; in particular the application identifier cannot change
/// under an already materialized cache root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Explicit cache root. When `None`, the root is resolved from the
    /// environment override or derived from the application identifier
    /// under the per-user data directory.
    pub cache_root: Option<PathBuf>,

    /// Application identifier shaping the derived default cache root.
    /// Has no effect when `cache_root` is set explicitly.
    pub application_id: Option<String>,

    /// Whether fetched files are cached and handed to the registrar.
    ///
    /// With caching off the loader accepts no work: every enqueue is
    /// dropped, since registration requires a local path and no local
    /// path exists without a cache.
    pub use_cache: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            cache_root: None,
            application_id: None,
            use_cache: true,
        }
    }
}

impl BatchConfig {
    /// Create a configuration with defaults: caching on, derived root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit cache root.
    ///
    /// Takes precedence over the environment override and the application
    /// identifier, which only shape the derived default.
    #[must_use]
    pub fn with_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = Some(root.into());
        self
    }

    /// Set the application identifier used to derive the default root.
    ///
    /// Validated when the loader is constructed: it must be a plain
    /// directory name, like an item key.
    #[must_use]
    pub fn with_application_id(mut self, id: impl Into<String>) -> Self {
        self.application_id = Some(id.into());
        self
    }

    /// Toggle caching.
    #[must_use]
    pub const fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }
}
