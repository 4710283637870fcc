//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the service. Nothing in
//! this crate reads environment variables while handling events or requests.

use crate::constants::DEFAULT_ALERT_CAPACITY;
use crate::{NotifyError, NotifyResult};
use notify_store::StoreScopeMode;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    scope_mode: StoreScopeMode,
    alert_capacity: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        data_dir: PathBuf,
        scope_mode: StoreScopeMode,
        alert_capacity: usize,
    ) -> NotifyResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(NotifyError::InvalidInput(
                "data directory cannot be empty".into(),
            ));
        }
        if alert_capacity == 0 {
            return Err(NotifyError::InvalidInput(
                "alert capacity must be at least 1".into(),
            ));
        }

        Ok(Self {
            data_dir,
            scope_mode,
            alert_capacity,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn scope_mode(&self) -> StoreScopeMode {
        self.scope_mode
    }

    pub fn alert_capacity(&self) -> usize {
        self.alert_capacity
    }
}

/// Parse the store scope mode from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`StoreScopeMode::Identity`].
pub fn scope_mode_from_env_value(value: Option<String>) -> NotifyResult<StoreScopeMode> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(v) => v.parse().map_err(NotifyError::InvalidInput),
        None => Ok(StoreScopeMode::Identity),
    }
}

/// Parse the alert capacity from an optional string value, defaulting when absent.
pub fn alert_capacity_from_env_value(value: Option<String>) -> NotifyResult<usize> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => v.parse::<usize>().map_err(|e| {
            NotifyError::InvalidInput(format!("invalid alert capacity '{}': {}", v, e))
        }),
        None => Ok(DEFAULT_ALERT_CAPACITY),
    }
}
