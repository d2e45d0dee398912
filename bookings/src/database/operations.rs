//! Read queries: rooms, availability, reservations and restrictions.
//!
//! Queries are associated functions over a `&Connection` so they can run
//! on a plain connection or inside a transaction.

use std::time::{Duration, SystemTime};

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::repository::{AvailabilityRepository, Deadline};
use crate::reservation::{GuestDetails, Reservation, ReservationId};
use crate::restriction::{Restriction, RestrictionId, RestrictionKind};
use crate::room::{Room, RoomId};
use crate::stay::StayRange;

use super::connection::{busy_error, is_busy, Database};

/// Converts a `SystemTime` to Unix epoch seconds for database storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| Error::Validation {
            field: "timestamp".into(),
            message: format!("Invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the database to a `SystemTime`.
#[allow(clippy::cast_sign_loss)]
pub(super) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}

fn conversion_error(
    column: usize,
    ty: Type,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, ty, err.into())
}

fn row_to_room(row: &Row<'_>) -> rusqlite::Result<Room> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let id = RoomId::try_from(id).map_err(|e| conversion_error(0, Type::Integer, e))?;
    Ok(Room::new(id, name))
}

// Columns: id, room_id, first_name, last_name, email, phone, start_date,
// end_date, processed, created_at, updated_at
fn row_to_reservation(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    let room_id = RoomId::try_from(row.get::<_, i64>(1)?)
        .map_err(|e| conversion_error(1, Type::Integer, e))?;
    let stay = StayRange::new(row.get(6)?, row.get(7)?)
        .map_err(|e| conversion_error(6, Type::Text, e))?;
    let guest = GuestDetails {
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
    };

    Reservation::builder(room_id, stay, guest)
        .id(ReservationId(row.get(0)?))
        .processed(row.get(8)?)
        .created_at(unix_secs_to_systemtime(row.get(9)?))
        .updated_at(unix_secs_to_systemtime(row.get(10)?))
        .build()
        .map_err(|e| conversion_error(0, Type::Integer, e))
}

// Columns: id, room_id, start_date, end_date, restriction_kind, reservation_id
fn row_to_restriction(row: &Row<'_>) -> rusqlite::Result<Restriction> {
    let room_id = RoomId::try_from(row.get::<_, i64>(1)?)
        .map_err(|e| conversion_error(1, Type::Integer, e))?;
    let stay = StayRange::new(row.get(2)?, row.get(3)?)
        .map_err(|e| conversion_error(2, Type::Text, e))?;
    let kind = row
        .get::<_, String>(4)?
        .parse::<RestrictionKind>()
        .map_err(|e| conversion_error(4, Type::Text, e))?;

    Ok(Restriction {
        id: RestrictionId(row.get(0)?),
        room_id,
        stay,
        kind,
        reservation_id: row.get::<_, Option<i64>>(5)?.map(ReservationId),
    })
}

const SELECT_ROOM: &str = "SELECT id, room_name FROM rooms WHERE id = ?";

const SELECT_ALL_ROOMS: &str = "SELECT id, room_name FROM rooms ORDER BY id";

const ROOM_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM rooms WHERE id = ?)";

const COUNT_OVERLAPPING_RESTRICTIONS: &str = r"
    SELECT COUNT(*)
    FROM restrictions
    WHERE room_id = ?1
      AND start_date < ?3
      AND ?2 < end_date
";

const SELECT_AVAILABLE_ROOMS: &str = r"
    SELECT r.id, r.room_name
    FROM rooms r
    WHERE NOT EXISTS (
        SELECT 1 FROM restrictions x
        WHERE x.room_id = r.id
          AND x.start_date < ?2
          AND ?1 < x.end_date
    )
    ORDER BY r.id
";

const SELECT_RESERVATION: &str = r"
    SELECT id, room_id, first_name, last_name, email, phone,
           start_date, end_date, processed, created_at, updated_at
    FROM reservations
    WHERE id = ?
";

const SELECT_ALL_RESERVATIONS: &str = r"
    SELECT id, room_id, first_name, last_name, email, phone,
           start_date, end_date, processed, created_at, updated_at
    FROM reservations
    ORDER BY id
";

const SELECT_RESTRICTIONS_FOR_ROOM: &str = r"
    SELECT id, room_id, start_date, end_date, restriction_kind, reservation_id
    FROM restrictions
    WHERE room_id = ?
    ORDER BY start_date, id
";

impl Database {
    /// Looks up a room by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_room(conn: &Connection, room_id: RoomId) -> Result<Option<Room>> {
        Ok(conn
            .query_row(SELECT_ROOM, [room_id.value()], row_to_room)
            .optional()?)
    }

    /// Lists all rooms ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn select_rooms(conn: &Connection) -> Result<Vec<Room>> {
        let mut stmt = conn.prepare(SELECT_ALL_ROOMS)?;
        let rooms = stmt
            .query_map([], row_to_room)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rooms)
    }

    /// Checks whether a room exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn room_exists(conn: &Connection, room_id: RoomId) -> Result<bool> {
        Ok(conn.query_row(ROOM_EXISTS, [room_id.value()], |row| row.get(0))?)
    }

    /// Counts restrictions on `room_id` that share a night with `stay`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_overlapping_restrictions(
        conn: &Connection,
        room_id: RoomId,
        stay: &StayRange,
    ) -> Result<i64> {
        Ok(conn.query_row(
            COUNT_OVERLAPPING_RESTRICTIONS,
            params![room_id.value(), stay.start(), stay.end()],
            |row| row.get(0),
        )?)
    }

    /// Checks whether no restriction on `room_id` overlaps `stay`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn room_is_free(conn: &Connection, room_id: RoomId, stay: &StayRange) -> Result<bool> {
        Ok(Self::count_overlapping_restrictions(conn, room_id, stay)? == 0)
    }

    /// Lists rooms with no restriction overlapping `stay`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn select_available_rooms(conn: &Connection, stay: &StayRange) -> Result<Vec<Room>> {
        let mut stmt = conn.prepare(SELECT_AVAILABLE_ROOMS)?;
        let rooms = stmt
            .query_map(params![stay.start(), stay.end()], row_to_room)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::debug!("{} room(s) available for {stay}", rooms.len());
        Ok(rooms)
    }

    /// Looks up a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn find_reservation(conn: &Connection, id: ReservationId) -> Result<Option<Reservation>> {
        Ok(conn
            .query_row(SELECT_RESERVATION, [id.0], row_to_reservation)
            .optional()?)
    }

    /// Lists all reservations ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn select_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
        let mut stmt = conn.prepare(SELECT_ALL_RESERVATIONS)?;
        let reservations = stmt
            .query_map([], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    /// Lists the restrictions on a room ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn select_restrictions_for_room(
        conn: &Connection,
        room_id: RoomId,
    ) -> Result<Vec<Restriction>> {
        let mut stmt = conn.prepare(SELECT_RESTRICTIONS_FOR_ROOM)?;
        let restrictions = stmt
            .query_map([room_id.value()], row_to_restriction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(restrictions)
    }
}

impl AvailabilityRepository for Database {
    fn is_room_available(&self, room_id: RoomId, stay: &StayRange) -> Result<bool> {
        Self::room_is_free(&self.conn, room_id, stay)
    }

    fn search_available_rooms(&self, stay: &StayRange, deadline: Deadline) -> Result<Vec<Room>> {
        deadline.check()?;
        let wait = self.busy_wait(deadline);
        self.set_busy_timeout(wait)?;
        let result = Self::select_available_rooms(&self.conn, stay);
        self.restore_busy_timeout(result).map_err(|err| match err {
            Error::Database(ref e) if is_busy(e) => busy_error(deadline, wait),
            other => other,
        })
    }

    fn get_room(&self, room_id: RoomId) -> Result<Option<Room>> {
        Self::find_room(&self.conn, room_id)
    }

    fn list_rooms(&self) -> Result<Vec<Room>> {
        Self::select_rooms(&self.conn)
    }

    fn get_reservation(&self, id: ReservationId) -> Result<Option<Reservation>> {
        Self::find_reservation(&self.conn, id)
    }

    fn list_reservations(&self) -> Result<Vec<Reservation>> {
        Self::select_reservations(&self.conn)
    }

    fn restrictions_for_room(&self, room_id: RoomId) -> Result<Vec<Restriction>> {
        Self::select_restrictions_for_room(&self.conn, room_id)
    }
}
