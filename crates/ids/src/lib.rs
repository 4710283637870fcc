//! Notification identifier utilities.
//!
//! Every notification merged by the reconciliation engine receives a locally generated
//! identifier. Identifiers must stay unique even when several events are merged within the same
//! millisecond, and they should sort roughly by merge time when read by a human.
//!
//! This crate provides:
//! - [`CanonicalUuid`], a wrapper that guarantees the canonical UUID form once constructed.
//! - [`NotificationId`], a time-prefixed identifier built from a timestamp and a canonical UUID.
//!
//! ## Canonical UUID form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! ## Notification identifier form
//! `YYYYMMDDTHHMMSS.mmmZ-<canonical_uuid>`
//!
//! Example: `20260111T143522.045Z-550e8400e29b41d4a716446655440000`

mod id;

pub use id::{CanonicalUuid, NotificationId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
