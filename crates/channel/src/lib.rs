//! # Notify Channel
//!
//! WebSocket client for the admin notification channel.
//!
//! [`WebSocketSource`] implements [`notify_core::EventSource`]: every session start opens one
//! connection carrying the session credential as the `token` query parameter, decodes text
//! frames into [`notify_types::RawEvent`]s and forwards them in arrival order. Dropped or failed
//! connections are retried with capped exponential backoff until the reconnection budget runs
//! out. Malformed frames are logged and skipped.
//!
//! Connection progress is modelled by [`ConnectionMachine`] and published as a
//! [`ConnectionState`] for diagnostics.

mod backoff;
mod config;
mod error;
mod source;
mod state;

pub use backoff::BackoffPolicy;
pub use config::{channel_url_from_env_value, ChannelConfig, DEFAULT_CHANNEL_URL, TOKEN_QUERY_PARAM};
pub use error::{ChannelError, ChannelResult};
pub use source::WebSocketSource;
pub use state::{ConnectionEvent, ConnectionMachine, ConnectionState};
