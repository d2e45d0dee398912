//! Restrictions: the reasons a room is unavailable over a stay.
//!
//! The restrictions table is the single source of truth for availability.
//! A booking creates a `reservation` restriction linked back to the
//! reservation; owners can block rooms with an `owner-block` restriction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::reservation::ReservationId;
use crate::room::RoomId;
use crate::stay::StayRange;

/// Database identifier of a restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestrictionId(pub i64);

impl fmt::Display for RestrictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a room is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestrictionKind {
    /// Held by a guest reservation.
    Reservation,
    /// Blocked by the owner.
    OwnerBlock,
}

impl RestrictionKind {
    /// Returns the tag stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reservation => "reservation",
            Self::OwnerBlock => "owner-block",
        }
    }
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestrictionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reservation" => Ok(Self::Reservation),
            "owner-block" => Ok(Self::OwnerBlock),
            _ => Err(format!("unknown restriction kind: {s}")),
        }
    }
}

/// A date span during which a room cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    /// The restriction identifier.
    pub id: RestrictionId,
    /// The restricted room.
    pub room_id: RoomId,
    /// The restricted nights.
    pub stay: StayRange,
    /// Why the room is restricted.
    pub kind: RestrictionKind,
    /// The reservation holding the room, for `reservation` restrictions.
    pub reservation_id: Option<ReservationId>,
}

impl Restriction {
    /// Checks whether this restriction blocks the given stay.
    #[must_use]
    pub fn blocks(&self, stay: &StayRange) -> bool {
        self.stay.overlaps(stay)
    }
}
