//! # Notify Core
//!
//! Notification reconciliation for the admin dashboard.
//!
//! This crate turns raw realtime events into the notification list an admin sees:
//! - Classification of event kinds into categories and human titles
//! - Deduplication, ordering and capping of the list, with read state
//! - Persistence of the list per session scope through `notify-store`
//! - Alerts for new notifications and click-through navigation targets
//! - The session lifecycle that attaches and detaches an [`EventSource`]
//!
//! **No transport concerns**: the WebSocket client lives in `notify-channel`, HTTP in
//! `api-rest`.

pub mod alert;
pub mod classify;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod navigation;
pub mod service;
pub mod session;
pub mod source;

pub use alert::Alert;
pub use classify::{classify, title_for};
pub use config::CoreConfig;
pub use engine::{IngestOutcome, ReconciliationEngine};
pub use error::{NotifyError, NotifyResult};
pub use navigation::NavigationTarget;
pub use service::NotificationService;
pub use session::{Session, SessionCredential};
pub use source::{EventSource, Subscription, SubscriptionHandle};
