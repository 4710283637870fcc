//! Connection state machine.
//!
//! ```text
//!                 Start
//! Disconnected ─────────▶ Connecting ──ConnectSucceeded──▶ Open
//!      ▲                   │      ▲                          │
//!      │ (exhausted)       │      │ BackoffElapsed           │ Dropped
//!      │                   ▼      │                          │
//!      └──────────── ConnectFailed ─▶ Backoff{attempt} ◀─────┘
//! ```
//!
//! `Stop` returns to `Disconnected` from any state.

use crate::backoff::BackoffPolicy;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Open,
    /// Waiting before reconnection attempt `attempt` (0-based).
    Backoff { attempt: u32 },
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => f.write_str("disconnected"),
            ConnectionState::Connecting => f.write_str("connecting"),
            ConnectionState::Open => f.write_str("open"),
            ConnectionState::Backoff { attempt } => write!(f, "backoff (attempt {})", attempt + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    Start,
    ConnectSucceeded,
    ConnectFailed,
    Dropped,
    BackoffElapsed,
    Stop,
}

/// Tracks the connection lifecycle and the reconnection budget.
#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    policy: BackoffPolicy,
    state: ConnectionState,
    /// Reconnection attempts scheduled since the last successful connect.
    attempts: u32,
    exhausted: bool,
}

impl ConnectionMachine {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            state: ConnectionState::Disconnected,
            attempts: 0,
            exhausted: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True once the reconnection budget ran out; cleared by the next `Start`.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Apply an event and return the resulting state. Events that do not apply to the
    /// current state leave it unchanged.
    pub fn handle(&mut self, event: ConnectionEvent) -> ConnectionState {
        use ConnectionEvent as E;
        use ConnectionState as S;

        self.state = match (self.state, event) {
            (_, E::Stop) => S::Disconnected,
            (S::Disconnected, E::Start) => {
                self.attempts = 0;
                self.exhausted = false;
                S::Connecting
            }
            (S::Connecting, E::ConnectSucceeded) => {
                self.attempts = 0;
                S::Open
            }
            (S::Connecting, E::ConnectFailed) | (S::Open, E::Dropped) => self.schedule_retry(),
            (S::Backoff { .. }, E::BackoffElapsed) => S::Connecting,
            (state, event) => {
                tracing::debug!("ignoring {:?} while {}", event, state);
                state
            }
        };
        self.state
    }

    fn schedule_retry(&mut self) -> ConnectionState {
        if self.attempts >= self.policy.max_attempts {
            self.exhausted = true;
            return ConnectionState::Disconnected;
        }
        let attempt = self.attempts;
        self.attempts += 1;
        ConnectionState::Backoff { attempt }
    }
}
