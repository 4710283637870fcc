//! The seam between the service and the realtime event channel.

use crate::session::SessionCredential;
use notify_types::RawEvent;
use tokio::sync::{mpsc, watch};

/// Produces decoded events for one authenticated session.
///
/// Implementations own connection management (including reconnection); the service only
/// consumes the event stream and detaches when the session ends.
pub trait EventSource: Send + Sync {
    /// Opens a subscription carrying `credential`. Called from within a tokio runtime.
    fn subscribe(&self, credential: &SessionCredential) -> Subscription;
}

/// A live event stream plus the means to stop its producer.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::Receiver<RawEvent>,
    handle: SubscriptionHandle,
}

impl Subscription {
    /// `shutdown` is flipped to `true` on detach; producers also treat a dropped handle as
    /// shutdown.
    pub fn new(events: mpsc::Receiver<RawEvent>, shutdown: watch::Sender<bool>) -> Self {
        Self {
            events,
            handle: SubscriptionHandle { shutdown },
        }
    }

    pub fn into_parts(self) -> (mpsc::Receiver<RawEvent>, SubscriptionHandle) {
        (self.events, self.handle)
    }
}

/// Stops the producer side of a [`Subscription`].
#[derive(Debug)]
pub struct SubscriptionHandle {
    shutdown: watch::Sender<bool>,
}

impl SubscriptionHandle {
    pub fn detach(&self) {
        let _ = self.shutdown.send(true);
    }
}
