//! Store constants.

/// Retention cap: the most notifications a slot ever holds.
pub const MAX_STORED_NOTIFICATIONS: usize = 100;

/// File name of a serialised notification list.
pub const STORE_FILE_NAME: &str = "notifications.json";
