//! Constants used throughout the notification core.

pub use notify_store::MAX_STORED_NOTIFICATIONS;

/// Default directory for persisted notification lists.
pub const DEFAULT_DATA_DIR: &str = "notification_data";

/// Default number of alerts buffered per alert subscriber before it starts lagging.
pub const DEFAULT_ALERT_CAPACITY: usize = 64;

/// Route of the verification review view.
pub const VERIFICATION_ROUTE: &str = "/verification";

/// Route of the reports view.
pub const REPORTS_ROUTE: &str = "/reports";
