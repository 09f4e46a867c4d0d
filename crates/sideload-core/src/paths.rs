//! Cache root resolution and directory upkeep.
//!
//! Resolution order: explicit configuration wins, then the
//! `SIDELOAD_CACHE_DIR` environment override, then a default derived from
//! the application identifier under the per-user data directory.
//! Resolution itself never touches the disk; callers materialize the
//! directory separately with [`ensure_cache_root`].

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BatchConfig;
use crate::errors::ConfigError;

/// Environment variable overriding the derived default cache root.
pub const CACHE_DIR_ENV: &str = "SIDELOAD_CACHE_DIR";

/// Resolve the cache root for a configuration.
///
/// 1. Explicit `cache_root` (highest priority)
/// 2. `SIDELOAD_CACHE_DIR` environment variable
/// 3. `<user-data-local>/sideload/cache[/<application_id>]`
///
/// The application identifier, when present, is validated regardless of
/// which branch wins, so a bad identifier never goes unnoticed just
/// because an explicit root shadowed it.
pub fn resolve_cache_root(config: &BatchConfig) -> Result<PathBuf, ConfigError> {
    if let Some(id) = &config.application_id {
        validate_application_id(id)?;
    }

    if let Some(root) = &config.cache_root {
        return Ok(root.clone());
    }

    if let Ok(path) = env::var(CACHE_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir().ok_or(ConfigError::NoUserDataDir)?;
    Ok(derive_default_root(
        &data_dir,
        config.application_id.as_deref(),
    ))
}

/// Build the derived default root under a given data directory.
fn derive_default_root(data_dir: &Path, application_id: Option<&str>) -> PathBuf {
    let base = data_dir.join("sideload").join("cache");
    match application_id {
        Some(id) => base.join(id),
        None => base,
    }
}

/// Check that an application identifier can serve as a directory name.
pub fn validate_application_id(id: &str) -> Result<(), ConfigError> {
    let reject = |reason: &str| ConfigError::InvalidApplicationId {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if id.is_empty() {
        return Err(reject("identifier must not be empty"));
    }
    if id == "." || id == ".." {
        return Err(reject("identifier must not be a dot component"));
    }
    if id.contains('/') || id.contains('\\') {
        return Err(reject("identifier must not contain path separators"));
    }
    Ok(())
}

/// Create the cache root (including parents) if it does not exist.
pub fn ensure_cache_root(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| ConfigError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Remove the cache root and everything under it. A missing root is fine.
pub fn remove_cache_root(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Ok(());
    }
    fs::remove_dir_all(path).map_err(|e| ConfigError::ClearFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
