//! Shared helpers for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::repository::AvailabilityRepository;
use crate::reservation::{DraftReservation, GuestDetails};
use crate::room::{Room, RoomId};
use crate::stay::StayRange;

/// Creates an empty database in a temporary directory.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the lifetime of the test process.
    std::mem::forget(dir);

    db
}

/// Creates a database seeded with rooms 1 and 2.
///
/// # Panics
///
/// Panics if the database cannot be created or seeded.
#[must_use]
pub fn create_seeded_database() -> Database {
    let mut db = create_test_database();
    db.seed_rooms(&[
        Room::new(room_id(1), "General's Quarters"),
        Room::new(room_id(2), "Major's Suite"),
    ])
    .unwrap();
    db
}

pub fn room_id(id: i64) -> RoomId {
    RoomId::try_from(id).unwrap()
}

pub fn stay(start: &str, end: &str) -> StayRange {
    StayRange::parse(start, end).unwrap()
}

pub fn guest() -> GuestDetails {
    GuestDetails {
        first_name: "Tal".into(),
        last_name: "Drori".into(),
        email: "tal@drori.com".into(),
        phone: "555-555-5555".into(),
    }
}

/// Builds a draft with guest details for a seeded room.
///
/// # Panics
///
/// Panics if the room does not exist.
pub fn draft(db: &Database, id: i64, stay: StayRange) -> DraftReservation {
    let room = db.get_room(room_id(id)).unwrap().unwrap();
    DraftReservation::new(room, stay).with_guest(guest())
}
