//! Write transactions: bookings, owner blocks and room seeding.
//!
//! Every write that holds a room runs check-then-insert inside one
//! `BEGIN IMMEDIATE` transaction. SQLite grants the write lock when the
//! transaction begins, so a second writer waits (up to the busy timeout)
//! before it can even run its availability check. The overlap trigger on
//! `restrictions` backs this up at the schema level.

use std::time::{Duration, SystemTime};

use rusqlite::{params, Connection, TransactionBehavior};

use crate::error::{Error, Result};
use crate::repository::{missing_room, room_taken, BookingRepository, Deadline};
use crate::reservation::{DraftReservation, ReservationId};
use crate::restriction::{RestrictionId, RestrictionKind};
use crate::room::{Room, RoomId};
use crate::stay::StayRange;

use super::connection::{busy_error, is_busy, Database};
use super::operations::systemtime_to_unix_secs;
use super::schema::OVERLAP_TRIGGER_MESSAGE;

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (room_id, first_name, last_name, email, phone, start_date, end_date,
     processed, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)
";

const INSERT_RESTRICTION: &str = r"
    INSERT INTO restrictions
    (start_date, end_date, room_id, reservation_id, restriction_kind,
     created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
";

const UPSERT_ROOM: &str = r"
    INSERT INTO rooms (id, room_name, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?3)
    ON CONFLICT(id) DO UPDATE SET
        room_name = excluded.room_name,
        updated_at = excluded.updated_at
";

fn is_overlap_abort(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            message.contains(OVERLAP_TRIGGER_MESSAGE)
        }
        _ => false,
    }
}

/// Maps low-level failures of a room-holding write onto the booking error
/// classes.
fn classify(
    err: Error,
    room_id: RoomId,
    stay: &StayRange,
    deadline: Deadline,
    waited: Duration,
) -> Error {
    match err {
        Error::Database(ref e) if is_overlap_abort(e) => {
            log::warn!("overlap trigger rejected room {room_id} for {stay}");
            room_taken(room_id, stay)
        }
        Error::Database(ref e) if is_busy(e) => busy_error(deadline, waited),
        other => other,
    }
}

fn run_hold(
    conn: &mut Connection,
    room_id: RoomId,
    stay: &StayRange,
    deadline: Deadline,
    insert: impl FnOnce(&Connection, i64) -> Result<RestrictionHold>,
) -> Result<RestrictionHold> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if !Database::room_exists(&tx, room_id)? {
        return Err(missing_room(room_id));
    }
    if !Database::room_is_free(&tx, room_id, stay)? {
        return Err(room_taken(room_id, stay));
    }

    let now = systemtime_to_unix_secs(SystemTime::now())?;
    let hold = insert(&tx, now)?;

    // Returning early drops the transaction, which rolls both inserts back.
    deadline.check()?;
    tx.commit()?;
    Ok(hold)
}

impl Database {
    /// Runs one room-holding write with the busy wait capped by `deadline`.
    fn hold_room(
        &mut self,
        room_id: RoomId,
        stay: &StayRange,
        deadline: Deadline,
        insert: impl FnOnce(&Connection, i64) -> Result<RestrictionHold>,
    ) -> Result<RestrictionHold> {
        deadline.check()?;
        let wait = self.busy_wait(deadline);
        self.set_busy_timeout(wait)?;
        let result = run_hold(&mut self.conn, room_id, stay, deadline, insert);
        self.restore_busy_timeout(result)
            .map_err(|err| classify(err, room_id, stay, deadline, wait))
    }

    /// Inserts or renames rooms in one transaction. Returns the number of
    /// rooms written.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; no rooms are written in that
    /// case.
    pub fn seed_rooms(&mut self, rooms: &[Room]) -> Result<usize> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let mut stmt = tx.prepare(UPSERT_ROOM)?;
            for room in rooms {
                stmt.execute(params![room.id.value(), room.name, now])?;
            }
        }
        tx.commit()?;
        log::info!("seeded {} room(s)", rooms.len());
        Ok(rooms.len())
    }
}

#[derive(Debug, Clone, Copy)]
struct RestrictionHold {
    reservation_id: Option<ReservationId>,
    restriction_id: RestrictionId,
}

impl BookingRepository for Database {
    fn create_reservation(
        &mut self,
        draft: &DraftReservation,
        deadline: Deadline,
    ) -> Result<ReservationId> {
        let guest = draft.require_guest()?.clone();
        let room_id = draft.room_id();
        let stay = draft.stay();

        let hold = self.hold_room(room_id, &stay, deadline, |conn, now| {
            conn.execute(
                INSERT_RESERVATION,
                params![
                    room_id.value(),
                    guest.first_name,
                    guest.last_name,
                    guest.email,
                    guest.phone,
                    stay.start(),
                    stay.end(),
                    now,
                ],
            )?;
            let reservation_id = ReservationId(conn.last_insert_rowid());

            conn.execute(
                INSERT_RESTRICTION,
                params![
                    stay.start(),
                    stay.end(),
                    room_id.value(),
                    reservation_id.0,
                    RestrictionKind::Reservation.as_str(),
                    now,
                ],
            )?;
            Ok(RestrictionHold {
                reservation_id: Some(reservation_id),
                restriction_id: RestrictionId(conn.last_insert_rowid()),
            })
        })?;

        let reservation_id = hold.reservation_id.ok_or_else(|| Error::DatabaseCorruption {
            details: "reservation insert returned no id".into(),
        })?;
        log::info!(
            "reserved room {room_id} for {stay} as reservation {reservation_id} (restriction {})",
            hold.restriction_id
        );
        Ok(reservation_id)
    }

    fn block_room(
        &mut self,
        room_id: RoomId,
        stay: &StayRange,
        deadline: Deadline,
    ) -> Result<RestrictionId> {
        let hold = self.hold_room(room_id, stay, deadline, |conn, now| {
            conn.execute(
                INSERT_RESTRICTION,
                params![
                    stay.start(),
                    stay.end(),
                    room_id.value(),
                    Option::<i64>::None,
                    RestrictionKind::OwnerBlock.as_str(),
                    now,
                ],
            )?;
            Ok(RestrictionHold {
                reservation_id: None,
                restriction_id: RestrictionId(conn.last_insert_rowid()),
            })
        })?;
        log::info!("blocked room {room_id} for {stay}");
        Ok(hold.restriction_id)
    }
}
