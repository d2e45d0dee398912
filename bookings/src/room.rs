//! Room identifiers and room reference data.
//!
//! Rooms are seeded out of band and never modified by the booking engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A positive room identifier.
///
/// # Examples
///
/// ```
/// use bookings::RoomId;
///
/// let id = RoomId::try_from(1).unwrap();
/// assert_eq!(id.value(), 1);
///
/// assert!(RoomId::try_from(0).is_err());
/// assert!("abc".parse::<RoomId>().is_err());
/// assert_eq!("7".parse::<RoomId>().unwrap().value(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RoomId(i64);

impl RoomId {
    /// Returns the underlying identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for RoomId {
    type Error = InvalidRoomIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            Err(InvalidRoomIdError {
                value: value.to_string(),
                reason: "room id must be a positive integer".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl From<RoomId> for i64 {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl FromStr for RoomId {
    type Err = InvalidRoomIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed.parse().map_err(|_| InvalidRoomIdError {
            value: trimmed.to_string(),
            reason: "room id must be a positive integer".into(),
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid room identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRoomIdError {
    /// The rejected input.
    pub value: String,
    /// The reason the identifier is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidRoomIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid room id '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidRoomIdError {}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// The room identifier.
    pub id: RoomId,
    /// The display name shown to guests.
    pub name: String,
}

impl Room {
    /// Creates a room.
    #[must_use]
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}
