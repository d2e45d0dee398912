//! Workflow states and the booking summary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reservation::{DraftReservation, GuestDetails, ReservationId};
use crate::room::Room;
use crate::stay::StayRange;

/// Where a guest is in the booking flow.
///
/// Persisted as JSON in the session store while the flow is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    /// No search yet.
    Searching,
    /// A search ran; `rooms` were free for `stay`.
    RoomsFound {
        /// The searched stay.
        stay: StayRange,
        /// Free rooms ordered by id.
        rooms: Vec<Room>,
    },
    /// A room was chosen; guest details are still missing.
    RoomSelected {
        /// The staged booking.
        draft: DraftReservation,
    },
    /// Guest details passed validation.
    DetailsCollected {
        /// The staged booking, with guest details.
        draft: DraftReservation,
    },
    /// The booking was persisted.
    Confirmed {
        /// What was booked.
        summary: BookingSummary,
    },
    /// The guest cancelled.
    Abandoned,
}

impl WorkflowState {
    /// Returns a short lowercase name for messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Searching => "searching",
            Self::RoomsFound { .. } => "rooms found",
            Self::RoomSelected { .. } => "room selected",
            Self::DetailsCollected { .. } => "details collected",
            Self::Confirmed { .. } => "confirmed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Returns `true` for `Confirmed` and `Abandoned`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed { .. } | Self::Abandoned)
    }

    /// Returns the staged draft, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&DraftReservation> {
        match self {
            Self::RoomSelected { draft } | Self::DetailsCollected { draft } => Some(draft),
            _ => None,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of a confirmed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// The new reservation.
    pub reservation_id: ReservationId,
    /// The booked room.
    pub room: Room,
    /// The booked stay.
    pub stay: StayRange,
    /// Who booked it.
    pub guest: GuestDetails,
}

impl fmt::Display for BookingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation {}: {} for {} ({} night(s)), guest {} <{}>",
            self.reservation_id,
            self.room,
            self.stay,
            self.stay.nights(),
            self.guest.full_name(),
            self.guest.email
        )
    }
}
