//! Identifier implementations.

use crate::{IdError, IdResult};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3f";

/// Canonical UUID representation (32 lowercase hex characters, no hyphens).
///
/// Once constructed the contained UUID is guaranteed to be canonical, so its string form can be
/// embedded in identifiers and compared byte-for-byte.
///
/// # Construction
/// - [`CanonicalUuid::new`] generates a fresh random UUID.
/// - [`CanonicalUuid::parse`] validates an externally supplied string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalUuid(Uuid);

impl Default for CanonicalUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonicalUuid {
    /// Generates a new random (v4) UUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses a UUID string that must already be in canonical form.
    ///
    /// Hyphenated or uppercase forms are rejected rather than normalised.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> IdResult<Self> {
        if !Self::is_canonical(input) {
            return Err(IdError::InvalidInput(format!(
                "UUID must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| IdError::InvalidInput(format!("invalid UUID '{}': {}", input, e)))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is in canonical UUID form.
    ///
    /// Purely syntactic: exactly 32 bytes of `0-9`/`a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for CanonicalUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for CanonicalUuid {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalUuid::parse(s)
    }
}

/// A time-prefixed notification identifier.
///
/// Format: `YYYYMMDDTHHMMSS.mmmZ-<canonical_uuid>`
///
/// The UUID component makes the identifier unique even for notifications merged in the same
/// instant. The timestamp component keeps identifiers human-readable and, when generated from
/// the previous identifier, strictly increasing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NotificationId {
    timestamp: DateTime<Utc>,
    uuid: CanonicalUuid,
}

impl NotificationId {
    /// Generate a new identifier.
    ///
    /// If `previous` is provided, the timestamp is guaranteed to be strictly greater than the
    /// previous one (by at least 1 ms).
    pub fn generate(previous: Option<&NotificationId>) -> Self {
        let now = truncate_to_millis(Utc::now());

        let timestamp = match previous {
            Some(prev) if now <= prev.timestamp => prev.timestamp + Duration::milliseconds(1),
            _ => now,
        };

        Self {
            timestamp,
            uuid: CanonicalUuid::new(),
        }
    }

    /// Returns the timestamp component.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the UUID component.
    pub fn uuid(&self) -> &CanonicalUuid {
        &self.uuid
    }
}

/// The textual form only carries milliseconds; keeping the in-memory value at the same
/// precision makes `parse(id.to_string()) == id` hold.
fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    let millis = ts.timestamp_millis();
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(ts)
}

impl FromStr for NotificationId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ts_str, uuid_str) = s.split_once('-').ok_or_else(|| {
            IdError::InvalidInput(format!("Invalid notification id format: '{}'", s))
        })?;

        let ts_no_z = ts_str.strip_suffix('Z').ok_or_else(|| {
            IdError::InvalidInput(format!("Timestamp must end with 'Z': '{}'", ts_str))
        })?;

        let naive = NaiveDateTime::parse_from_str(ts_no_z, TIMESTAMP_FORMAT).map_err(|e| {
            IdError::InvalidInput(format!("Invalid timestamp format '{}': {}", ts_str, e))
        })?;

        Ok(Self {
            timestamp: DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc),
            uuid: CanonicalUuid::parse(uuid_str)?,
        })
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Z-{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.uuid
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NotificationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NotificationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NotificationId::from_str(&s).map_err(serde::de::Error::custom)
    }
}
