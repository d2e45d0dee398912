//! The storage seam for availability queries and bookings.
//!
//! [`AvailabilityRepository`] answers read-only questions about rooms and
//! restrictions. [`BookingRepository`] adds the two writes that hold a room:
//! a guest reservation and an owner block. Both writes follow the same
//! protocol: re-check availability and insert inside one serialized unit of
//! work, or fail with no partial state.
//!
//! Implemented by [`crate::Database`] (SQLite) and [`InMemoryRepository`].

mod memory;

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::reservation::{DraftReservation, Reservation, ReservationId};
use crate::restriction::{Restriction, RestrictionId};
use crate::room::{Room, RoomId};
use crate::stay::StayRange;

pub use memory::InMemoryRepository;

/// An optional point in time by which an operation must complete.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bookings::Deadline;
///
/// assert!(Deadline::none().check().is_ok());
/// assert!(Deadline::after(Duration::ZERO).check().is_err());
/// assert!(Deadline::after(Duration::from_secs(60)).remaining().is_some());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// A deadline that never expires.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// A deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        Self(Some(now.checked_add(timeout).unwrap_or(now)))
    }

    /// A deadline at a fixed instant.
    #[must_use]
    pub const fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    /// Time left before the deadline, or `None` when unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.0.map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Returns `true` once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }

    /// Fails with [`Error::Timeout`] if the deadline has passed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when expired.
    pub fn check(&self) -> Result<()> {
        if self.is_expired() {
            return Err(Error::Timeout);
        }
        Ok(())
    }
}

/// Read-only availability queries.
pub trait AvailabilityRepository {
    /// Checks whether no restriction for `room_id` overlaps `stay`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails; never reports a room as
    /// available on error.
    fn is_room_available(&self, room_id: RoomId, stay: &StayRange) -> Result<bool>;

    /// Lists every room with no overlapping restriction, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] once `deadline` has passed, or a storage
    /// error if the query fails.
    fn search_available_rooms(&self, stay: &StayRange, deadline: Deadline) -> Result<Vec<Room>>;

    /// Looks up a room.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    fn get_room(&self, room_id: RoomId) -> Result<Option<Room>>;

    /// Lists all rooms ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    fn list_rooms(&self) -> Result<Vec<Room>>;

    /// Looks up a reservation.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    fn get_reservation(&self, id: ReservationId) -> Result<Option<Reservation>>;

    /// Lists all reservations ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    fn list_reservations(&self) -> Result<Vec<Reservation>>;

    /// Lists the restrictions on a room ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    fn restrictions_for_room(&self, room_id: RoomId) -> Result<Vec<Restriction>>;
}

/// Writes that hold a room for a stay.
pub trait BookingRepository: AvailabilityRepository {
    /// Atomically persists a reservation and the restriction holding its
    /// room.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the draft has no guest details or the room
    ///   does not exist
    /// - [`Error::Conflict`] if the room is no longer free
    /// - [`Error::Timeout`] if `deadline` passes before commit
    /// - a storage error if either insert fails
    ///
    /// No rows are written unless `Ok` is returned.
    fn create_reservation(
        &mut self,
        draft: &DraftReservation,
        deadline: Deadline,
    ) -> Result<ReservationId>;

    /// Blocks a room for a stay on behalf of the owner.
    ///
    /// # Errors
    ///
    /// Same classes as [`BookingRepository::create_reservation`].
    fn block_room(
        &mut self,
        room_id: RoomId,
        stay: &StayRange,
        deadline: Deadline,
    ) -> Result<RestrictionId>;
}

pub(crate) fn missing_room(room_id: RoomId) -> Error {
    Error::Validation {
        field: "room_id".into(),
        message: format!("room {room_id} does not exist"),
    }
}

pub(crate) fn room_taken(room_id: RoomId, stay: &StayRange) -> Error {
    Error::Conflict {
        room_id,
        details: format!("already restricted for {stay}"),
    }
}
