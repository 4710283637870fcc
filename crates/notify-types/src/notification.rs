//! The durable, user-facing notification record.

use crate::Details;
use chrono::{DateTime, Utc};
use notify_ids::NotificationId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity classification shared by alerts and the notification panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Info => "info",
            Category::Success => "success",
            Category::Warning => "warning",
            Category::Error => "error",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification as held in the list and in persistent storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    /// Capture time at merge, not server send time.
    pub timestamp: DateTime<Utc>,
    pub category: Category,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

impl Notification {
    /// The originating event kind, as recorded in `details.kind`.
    pub fn kind(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.get("kind"))
            .and_then(|v| v.as_str())
    }
}
