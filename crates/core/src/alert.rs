//! Transient alerts raised for newly merged notifications.

use crate::navigation::NavigationTarget;
use notify_types::{Category, NotificationId};

/// What a toast-style surface needs to show one new notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub notification_id: NotificationId,
    pub category: Category,
    pub message: String,
    /// Where clicking the alert should navigate, if anywhere.
    pub target: Option<NavigationTarget>,
}
