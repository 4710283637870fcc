//! Session lifecycle around the reconciliation engine.
//!
//! [`NotificationService`] is the handle the rest of the application holds. It starts a
//! notification session when an admin signs in, feeds events from the [`EventSource`] into the
//! engine, and tears everything down again on sign-out.
//!
//! Each session gets a generation number. The receive loop checks the generation under the
//! engine lock before merging an event, so anything still queued when [`NotificationService::stop`]
//! runs is discarded instead of leaking into the next session.

use crate::alert::Alert;
use crate::config::CoreConfig;
use crate::engine::{IngestOutcome, ReconciliationEngine};
use crate::navigation::NavigationTarget;
use crate::session::Session;
use crate::source::{EventSource, SubscriptionHandle};
use crate::{NotifyError, NotifyResult};
use notify_store::{NotificationStore, StoreScopeMode};
use notify_types::{NonEmptyText, Notification, NotificationId, RawEvent};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Cloneable handle to the notification state of the current admin session.
#[derive(Clone)]
pub struct NotificationService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    state: Mutex<ServiceState>,
    source: Arc<dyn EventSource>,
    scope_mode: StoreScopeMode,
    alerts: broadcast::Sender<Alert>,
}

struct ServiceState {
    engine: ReconciliationEngine,
    generation: u64,
    active: Option<ActiveSession>,
}

struct ActiveSession {
    admin_id: NonEmptyText,
    handle: SubscriptionHandle,
    receiver: JoinHandle<()>,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        source: Arc<dyn EventSource>,
        config: &CoreConfig,
    ) -> Self {
        let (alerts, _) = broadcast::channel(config.alert_capacity());
        let engine = ReconciliationEngine::new(store, alerts.clone());

        Self {
            inner: Arc::new(ServiceInner {
                state: Mutex::new(ServiceState {
                    engine,
                    generation: 0,
                    active: None,
                }),
                source,
                scope_mode: config.scope_mode(),
                alerts,
            }),
        }
    }

    /// Start a session: load the admin's list and attach the event source.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::SessionActive`] if a session is already running.
    pub fn start(&self, session: Session) -> NotifyResult<()> {
        let mut state = self.inner.lock();
        if state.active.is_some() {
            return Err(NotifyError::SessionActive);
        }

        state.generation += 1;
        let generation = state.generation;
        state
            .engine
            .begin_session(self.inner.scope_mode.scope_for(&session.admin_id));

        let (events, handle) = self.inner.source.subscribe(&session.credential).into_parts();
        let receiver = tokio::spawn(receive_loop(
            Arc::downgrade(&self.inner),
            generation,
            events,
        ));

        tracing::info!("notification session {} started", generation);
        state.active = Some(ActiveSession {
            admin_id: session.admin_id,
            handle,
            receiver,
        });
        Ok(())
    }

    /// Sign-out: discard the session's list, empty its persisted slot and detach the source.
    ///
    /// Returns false when no session was running.
    pub fn stop(&self) -> bool {
        let active = {
            let mut state = self.inner.lock();
            let Some(active) = state.active.take() else {
                return false;
            };
            state.generation += 1;
            state.engine.end_session();
            active
        };

        active.handle.detach();
        active.receiver.abort();
        tracing::info!("notification session ended");
        true
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().active.is_some()
    }

    /// The admin of the running session, if any.
    pub fn admin_id(&self) -> Option<NonEmptyText> {
        self.inner
            .lock()
            .active
            .as_ref()
            .map(|a| a.admin_id.clone())
    }

    /// Snapshot of the list, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.lock().engine.notifications().to_vec()
    }

    pub fn unread_count(&self) -> usize {
        self.inner.lock().engine.unread_count()
    }

    pub fn mark_one_as_read(&self, id: &NotificationId) -> bool {
        self.inner.lock().engine.mark_read(id)
    }

    pub fn mark_all_as_read(&self) {
        self.inner.lock().engine.mark_all_read();
    }

    pub fn clear_all_notifications(&self) {
        self.inner.lock().engine.clear();
    }

    pub fn open(&self, id: &NotificationId) -> Option<NavigationTarget> {
        self.inner.lock().engine.open(id)
    }

    /// Subscribe to alerts for notifications merged from now on.
    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Alert> {
        self.inner.alerts.subscribe()
    }
}

impl ServiceInner {
    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn receive_loop(
    inner: Weak<ServiceInner>,
    generation: u64,
    mut events: mpsc::Receiver<RawEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        let mut state = inner.lock();
        if state.generation != generation {
            tracing::debug!("discarding event from ended session {}", generation);
            break;
        }
        if let IngestOutcome::Appended(id) = state.engine.ingest(event) {
            tracing::debug!("merged notification {}", id);
        }
    }
    tracing::debug!("receive loop for session {} finished", generation);
}
