//! Notification reconciliation.
//!
//! [`ReconciliationEngine`] owns the in-memory notification list of the current session. It
//! merges inbound [`RawEvent`]s into the list, keeps read state, and writes the list back to the
//! [`NotificationStore`] after every mutation.
//!
//! # List invariants
//!
//! - ids are unique
//! - newest first; entries are never reordered after insertion
//! - at most [`MAX_STORED_NOTIFICATIONS`] entries, oldest dropped first
//! - `read` only ever goes from `false` to `true`
//!
//! # Persistence
//!
//! The store is only touched while a session scope is set. Store failures are logged and the
//! in-memory list stays authoritative.

use crate::alert::Alert;
use crate::classify::{classify, title_for};
use crate::constants::MAX_STORED_NOTIFICATIONS;
use crate::navigation::NavigationTarget;
use chrono::Utc;
use notify_store::{NotificationStore, StoreScope};
use notify_types::{Notification, NotificationId, RawEvent};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Result of merging one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new notification was prepended and an alert raised.
    Appended(NotificationId),
    /// An unread notification with the same title and message already exists.
    Duplicate,
    /// No session is active; the event was ignored.
    NoSession,
}

pub struct ReconciliationEngine {
    notifications: Vec<Notification>,
    scope: Option<StoreScope>,
    store: Arc<dyn NotificationStore>,
    alerts: broadcast::Sender<Alert>,
    last_id: Option<NotificationId>,
}

impl ReconciliationEngine {
    pub fn new(store: Arc<dyn NotificationStore>, alerts: broadcast::Sender<Alert>) -> Self {
        Self {
            notifications: Vec::new(),
            scope: None,
            store,
            alerts,
            last_id: None,
        }
    }

    /// Enter a session: load the scope's persisted list, or start empty.
    ///
    /// Load failures (missing slot, corrupt data, I/O) never propagate.
    pub fn begin_session(&mut self, scope: StoreScope) {
        let loaded = match self.store.load(&scope) {
            Ok(Some(list)) => normalise_loaded(list),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("failed to load persisted notifications, starting empty: {}", e);
                Vec::new()
            }
        };

        tracing::info!("notification session started with {} stored", loaded.len());
        self.last_id = loaded.first().map(|n| n.id.clone());
        self.notifications = loaded;
        self.scope = Some(scope);
    }

    /// Leave the session: drop the list and empty the scope's persisted slot.
    pub fn end_session(&mut self) {
        self.notifications.clear();
        self.last_id = None;
        if let Some(scope) = self.scope.take() {
            if let Err(e) = self.store.clear(&scope) {
                tracing::warn!("failed to clear persisted notifications: {}", e);
            }
        }
    }

    pub fn has_session(&self) -> bool {
        self.scope.is_some()
    }

    /// Merge one event into the list.
    pub fn ingest(&mut self, event: RawEvent) -> IngestOutcome {
        if self.scope.is_none() {
            tracing::debug!("ignoring '{}' event outside a session", event.kind);
            return IngestOutcome::NoSession;
        }

        let kind = event.kind.as_str();
        let title = title_for(kind);
        let duplicate = self
            .notifications
            .iter()
            .any(|n| !n.read && n.title == title && n.message == event.message);
        if duplicate {
            tracing::debug!("dropping duplicate unread '{}' notification", kind);
            return IngestOutcome::Duplicate;
        }

        let category = classify(kind);
        let id = NotificationId::generate(self.last_id.as_ref());
        self.last_id = Some(id.clone());

        let mut details = event.details.unwrap_or_default();
        details.insert("kind".into(), serde_json::Value::String(kind.to_string()));

        let alert = Alert {
            notification_id: id.clone(),
            category,
            message: event.message.clone(),
            target: NavigationTarget::for_kind(kind),
        };

        self.notifications.insert(
            0,
            Notification {
                id: id.clone(),
                title,
                message: event.message,
                timestamp: Utc::now(),
                category,
                read: false,
                details: Some(details),
            },
        );
        self.notifications.truncate(MAX_STORED_NOTIFICATIONS);
        self.persist();

        // No subscribers is fine: alerts are transient.
        let _ = self.alerts.send(alert);

        IngestOutcome::Appended(id)
    }

    /// Mark one notification read. Unknown ids are a no-op.
    ///
    /// Returns true when a notification changed state.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        let changed = match self.notifications.iter_mut().find(|n| &n.id == id) {
            Some(n) if !n.read => {
                n.read = true;
                true
            }
            _ => false,
        };
        if changed {
            self.persist();
        }
        changed
    }

    /// Mark every notification read.
    pub fn mark_all_read(&mut self) {
        for n in self.notifications.iter_mut() {
            n.read = true;
        }
        self.persist();
    }

    /// Empty the list and persist the empty state.
    pub fn clear(&mut self) {
        self.notifications.clear();
        self.persist();
    }

    /// Panel row click: mark the notification read and resolve where it leads.
    pub fn open(&mut self, id: &NotificationId) -> Option<NavigationTarget> {
        self.mark_read(id);
        self.notifications
            .iter()
            .find(|n| &n.id == id)
            .and_then(|n| n.kind())
            .and_then(NavigationTarget::for_kind)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    /// Count of unread notifications, derived from the list on every call.
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    fn persist(&self) {
        let Some(scope) = &self.scope else {
            return;
        };
        if let Err(e) = self.store.save(scope, &self.notifications) {
            tracing::warn!("failed to persist notifications, keeping in memory: {}", e);
        }
    }
}

/// Drop repeated ids (first occurrence wins) and enforce the cap on a loaded list.
fn normalise_loaded(list: Vec<Notification>) -> Vec<Notification> {
    let mut seen = HashSet::new();
    let before = list.len();
    let mut out: Vec<Notification> = list
        .into_iter()
        .filter(|n| seen.insert(n.id.clone()))
        .collect();
    out.truncate(MAX_STORED_NOTIFICATIONS);
    if out.len() != before {
        tracing::warn!(
            "persisted notification list normalised from {} to {} entries",
            before,
            out.len()
        );
    }
    out
}
