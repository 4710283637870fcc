//! Inbound realtime payloads.

use crate::TextError;
use serde::{Deserialize, Serialize};

/// Open-ended auxiliary fields attached to an event or notification.
pub type Details = serde_json::Map<String, serde_json::Value>;

/// Error raised when an inbound payload cannot be decoded into a [`RawEvent`].
#[derive(Debug, thiserror::Error)]
#[error("malformed event payload: {0}")]
pub struct EventDecodeError(#[from] serde_json::Error);

/// The event tag, kept exactly as sent.
///
/// Blank tags are rejected, but surrounding whitespace is preserved so that a padded tag
/// never matches a registered kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKind(String);

impl EventKind {
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EventKind::new(s).map_err(serde::de::Error::custom)
    }
}

/// An unprocessed event received from the realtime channel.
///
/// Wire shape: `{ "kind": string, "message": string, "details"?: object }`. The backend
/// broadcaster names the tag field `type`, which is accepted as an alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(alias = "type")]
    pub kind: EventKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

impl RawEvent {
    /// Builds an event without details.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Result<Self, TextError> {
        Ok(Self {
            kind: EventKind::new(kind)?,
            message: message.into(),
            details: None,
        })
    }

    /// Attaches auxiliary details.
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = Some(details);
        self
    }

    /// Decodes a single text frame.
    ///
    /// Missing `kind`/`message`, a blank `kind` or a non-object `details` are decode failures.
    pub fn decode(payload: &str) -> Result<Self, EventDecodeError> {
        Ok(serde_json::from_str(payload)?)
    }
}
