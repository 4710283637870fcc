//! Notification Store
//!
//! Durable storage for the notification list of an authenticated admin session.
//!
//! ## Design Principles
//!
//! - One slot holds one serialised array of notifications, newest first
//! - A slot never holds more than [`MAX_STORED_NOTIFICATIONS`] entries
//! - Slots are addressed by a [`StoreScope`]; identity scopes never reveal the admin identifier
//!   on disk
//! - All operations are synchronous; callers decide whether failures are fatal
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── notifications.json          # deployment scope
//! └── 3f/
//!     └── a1/
//!         └── 3fa1…               # sha256(admin id), identity scope
//!             └── notifications.json
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use notify_store::{FileNotificationStore, NotificationStore, StoreScope};
//! use notify_types::NonEmptyText;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileNotificationStore::new(Path::new("notification_data"))?;
//! let scope = StoreScope::for_identity(&NonEmptyText::new("admin@example.com")?);
//! let stored = store.load(&scope)?.unwrap_or_default();
//! store.save(&scope, &stored)?;
//! # Ok(())
//! # }
//! ```

mod constants;
mod file;
mod memory;
mod scope;

pub use constants::{MAX_STORED_NOTIFICATIONS, STORE_FILE_NAME};
pub use file::FileNotificationStore;
pub use memory::MemoryNotificationStore;
pub use scope::{IdentityKey, StoreScope, StoreScopeMode};

use notify_types::Notification;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Root directory exists but is not a directory
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// Persisted data could not be decoded
    #[error("Corrupt notification store at {location}: {source}")]
    Corrupt {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// The list could not be serialised
    #[error("Failed to serialise notifications: {0}")]
    Serialization(serde_json::Error),

    /// The backing storage refused the operation (quota, read-only medium)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable key-value slot holding a serialised notification list.
pub trait NotificationStore: Send + Sync {
    /// Returns the stored list, or `None` when the slot is empty.
    fn load(&self, scope: &StoreScope) -> StoreResult<Option<Vec<Notification>>>;

    /// Replaces the slot contents. Implementations keep at most [`MAX_STORED_NOTIFICATIONS`]
    /// entries, dropping from the end of the list.
    fn save(&self, scope: &StoreScope, notifications: &[Notification]) -> StoreResult<()>;

    /// Empties the slot. Clearing an empty slot succeeds.
    fn clear(&self, scope: &StoreScope) -> StoreResult<()>;
}

/// Shared by both implementations so the cap is enforced identically.
pub(crate) fn encode_capped(notifications: &[Notification]) -> StoreResult<Vec<u8>> {
    let end = notifications.len().min(MAX_STORED_NOTIFICATIONS);
    serde_json::to_vec(&notifications[..end]).map_err(StoreError::Serialization)
}

pub(crate) fn decode(location: &str, bytes: &[u8]) -> StoreResult<Vec<Notification>> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Corrupt {
        location: location.to_string(),
        source,
    })
}
