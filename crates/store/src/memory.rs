//! In-process notification store.

use crate::{decode, encode_capped, NotificationStore, StoreError, StoreResult, StoreScope};
use notify_types::Notification;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Keeps serialised lists in memory.
///
/// Lists go through the same JSON encoding as the file store, so a load after a save behaves
/// like a page reload. Writes can be made to fail on demand to exercise degraded persistence.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    slots: Mutex<HashMap<StoreScope, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, `save` and `clear` return [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Overwrites a slot with arbitrary bytes.
    pub fn put_raw(&self, scope: &StoreScope, bytes: impl Into<Vec<u8>>) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scope.clone(), bytes.into());
    }

    pub fn contains(&self, scope: &StoreScope) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(scope)
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

impl NotificationStore for MemoryNotificationStore {
    fn load(&self, scope: &StoreScope) -> StoreResult<Option<Vec<Notification>>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.get(scope) {
            Some(bytes) => decode(&format!("memory:{:?}", scope), bytes).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, scope: &StoreScope, notifications: &[Notification]) -> StoreResult<()> {
        self.check_writable()?;
        let bytes = encode_capped(notifications)?;
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scope.clone(), bytes);
        Ok(())
    }

    fn clear(&self, scope: &StoreScope) -> StoreResult<()> {
        self.check_writable()?;
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(scope);
        Ok(())
    }
}
