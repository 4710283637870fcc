//! Authenticated session inputs supplied by the session provider.

use crate::NotifyResult;
use notify_types::NonEmptyText;
use std::fmt;

/// The bearer credential of the current session.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(NonEmptyText);

impl SessionCredential {
    pub fn new(token: impl AsRef<str>) -> NotifyResult<Self> {
        Ok(Self(NonEmptyText::new(token)?))
    }

    /// The raw token, for placing on the wire.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionCredential(***)")
    }
}

/// An authenticated admin session.
#[derive(Debug, Clone)]
pub struct Session {
    pub credential: SessionCredential,
    pub admin_id: NonEmptyText,
}

impl Session {
    pub fn new(token: impl AsRef<str>, admin_id: impl AsRef<str>) -> NotifyResult<Self> {
        Ok(Self {
            credential: SessionCredential::new(token)?,
            admin_id: NonEmptyText::new(admin_id)?,
        })
    }
}
