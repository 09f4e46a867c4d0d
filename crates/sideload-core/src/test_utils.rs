//! Test helpers for code that reads process environment variables.
//!
//! The environment is process-global state: tests that read or write
//! variables like `SIDELOAD_CACHE_DIR` must hold [`ENV_LOCK`] for their
//! whole body and restore the previous value when done.

use std::env;
use std::sync::Mutex;

/// Serializes tests that depend on environment variables.
///
/// Cargo runs tests on parallel threads; without the lock, two tests
/// mutating the same variable observe each other's state.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// RAII guard that restores an environment variable on drop.
///
/// ```ignore
/// let _lock = ENV_LOCK.lock().unwrap();
/// let _env = EnvVarGuard::set("SIDELOAD_CACHE_DIR", "/tmp/cache");
/// // ... the previous value comes back when _env drops ...
/// ```
pub struct EnvVarGuard {
    key: String,
    previous: Option<String>,
}

impl EnvVarGuard {
    /// Set `key` to `value`, remembering the value it replaces.
    #[allow(unsafe_code)]
    pub fn set(key: &str, value: &str) -> Self {
        let previous = env::var(key).ok();
        unsafe {
            env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvVarGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { env::set_var(&self.key, value) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}
