//! JSON request and response bodies.

use notify_core::NavigationTarget;
use notify_types::Notification;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// One notification as shown in the dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationRes {
    /// `YYYYMMDDTHHMMSS.mmmZ-<uuid>`
    pub id: String,
    pub title: String,
    pub message: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    /// One of `info`, `success`, `warning`, `error`
    pub category: String,
    pub read: bool,
    #[schema(value_type = Option<Object>)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Notification> for NotificationRes {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            title: n.title.clone(),
            message: n.message.clone(),
            timestamp: n.timestamp.to_rfc3339(),
            category: n.category.as_str().to_string(),
            read: n.read,
            details: n.details.clone().map(serde_json::Value::Object),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListNotificationsRes {
    pub notifications: Vec<NotificationRes>,
    pub unread_count: u64,
}

impl ListNotificationsRes {
    /// Builds the response from one snapshot so the count always matches the list.
    pub fn from_snapshot(list: &[Notification]) -> Self {
        Self {
            notifications: list.iter().map(NotificationRes::from).collect(),
            unread_count: list.iter().filter(|n| !n.read).count() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountRes {
    pub unread_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StartSessionReq {
    pub token: String,
    pub admin_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StartSessionRes {
    pub admin_id: String,
}

/// Where a notification leads; `null` when it has no destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NavigationRes {
    pub target: Option<String>,
}

impl From<Option<NavigationTarget>> for NavigationRes {
    fn from(target: Option<NavigationTarget>) -> Self {
        Self {
            target: target.map(|t| t.path().to_string()),
        }
    }
}

/// Realtime channel state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionRes {
    /// One of `disconnected`, `connecting`, `open`, `backoff`
    pub state: String,
    /// Reconnection attempt being waited for (1-based), while in `backoff`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
}
