//! Common ID Types
//!
//! Type-safe wrappers around the opaque identifiers used by the ticketing
//! backend. Identifiers are strings on the wire (QR payloads embed them
//! verbatim), so the wrapper keeps the exact text it was built from.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// Upper bound on identifier length accepted from untrusted input
pub const MAX_ID_LEN: usize = 128;

/// Rejected identifier text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier exceeds {MAX_ID_LEN} bytes")]
    TooLong,
    #[error("identifier contains whitespace or control characters")]
    InvalidCharacter,
}

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type BookingId = Id<markers::Booking>;
/// let id = BookingId::parse("B123").unwrap();
/// assert_eq!(id.as_str(), "B123");
/// ```
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4 text)
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            _marker: PhantomData,
        }
    }

    /// Validate and wrap untrusted identifier text
    pub fn parse(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdError::Empty);
        }
        if value.len() > MAX_ID_LEN {
            return Err(IdError::TooLong);
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(IdError::InvalidCharacter);
        }
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid.to_string(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    pub struct Booking;
    pub struct Ticket;
    pub struct Event;
    pub struct User;
}

pub type BookingId = Id<markers::Booking>;
pub type TicketId = Id<markers::Ticket>;
pub type EventId = Id<markers::Event>;
pub type UserId = Id<markers::User>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_text_verbatim() {
        let id = BookingId::parse("jd7f2k9x0b1c").unwrap();
        assert_eq!(id.as_str(), "jd7f2k9x0b1c");
        assert_eq!(id.to_string(), "jd7f2k9x0b1c");
    }

    #[test]
    fn test_parse_rejects_bad_text() {
        assert_eq!(BookingId::parse(""), Err(IdError::Empty));
        assert_eq!(BookingId::parse("a b"), Err(IdError::InvalidCharacter));
        assert_eq!(BookingId::parse("x".repeat(129)), Err(IdError::TooLong));
        assert!(BookingId::parse("x".repeat(128)).is_ok());
    }

    #[test]
    fn test_new_is_uuid_text() {
        let id = UserId::new();
        let uuid: Uuid = id.as_str().parse().unwrap();
        assert_eq!(uuid.get_version_num(), 4);
    }

    #[test]
    fn test_serde_transparent() {
        let id = TicketId::parse("T9").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""T9""#);
        let back: TicketId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<TicketId>(r#""""#).is_err());
    }
}
