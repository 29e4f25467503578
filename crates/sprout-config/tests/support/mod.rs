//! Environment isolation shared by the configuration tests.

use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use sprout_config::{LOG_FILTER_VAR, LOG_FORMAT_VAR, NAME_SEPARATOR_VAR};

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const MANAGED: [&str; 3] = [LOG_FILTER_VAR, LOG_FORMAT_VAR, NAME_SEPARATOR_VAR];

/// Holds the environment lock with every `SPROUT_*` setting cleared, and
/// restores the previous values on drop.
pub struct EnvScope {
    saved: Vec<(&'static str, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvScope {
    pub fn clean() -> Self {
        let guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
        let saved = MANAGED
            .iter()
            .map(|key| (*key, std::env::var_os(key)))
            .collect();
        for key in MANAGED {
            // Environment mutation is unsafe on edition 2024; ENV_MUTEX
            // serialises every test that touches these variables.
            unsafe { std::env::remove_var(key) };
        }
        Self {
            saved,
            _guard: guard,
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        assert!(MANAGED.contains(&key), "{key} is not restored on drop");
        unsafe { std::env::set_var(key, value) };
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            match value {
                Some(previous) => unsafe { std::env::set_var(key, previous) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}
