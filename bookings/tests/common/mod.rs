//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use bookings::{
    Database, DatabaseConfig, DraftReservation, FormValues, GuestDetails, InMemoryRepository,
    Room, RoomId, StayRange,
};

pub fn room_id(id: i64) -> RoomId {
    RoomId::try_from(id).unwrap()
}

pub fn stay(start: &str, end: &str) -> StayRange {
    StayRange::parse(start, end).unwrap()
}

pub fn rooms() -> Vec<Room> {
    vec![
        Room::new(room_id(1), "General's Quarters"),
        Room::new(room_id(2), "Major's Suite"),
    ]
}

pub fn guest(first_name: &str) -> GuestDetails {
    GuestDetails {
        first_name: first_name.into(),
        last_name: "Drori".into(),
        email: "tal@drori.com".into(),
        phone: "555-555-5555".into(),
    }
}

pub fn draft(room: &Room, stay: StayRange) -> DraftReservation {
    DraftReservation::new(room.clone(), stay).with_guest(guest("Tal"))
}

pub fn details_form(first_name: &str) -> FormValues {
    FormValues::from_pairs([
        ("first_name", first_name),
        ("last_name", "Drori"),
        ("email", "tal@drori.com"),
        ("phone", "555-555-5555"),
    ])
}

/// A database file in a temporary directory that outlives individual
/// connections.
pub struct TestStore {
    pub dir: TempDir,
}

impl TestStore {
    /// Creates the database and seeds the two default rooms.
    pub fn seeded() -> Self {
        let store = Self {
            dir: TempDir::new().unwrap(),
        };
        store.open().seed_rooms(&rooms()).unwrap();
        store
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("bookings.db")
    }

    pub fn config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.path())
    }

    pub fn open(&self) -> Database {
        Database::open(self.config()).unwrap()
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }
}

pub fn memory_repo() -> InMemoryRepository {
    InMemoryRepository::with_rooms(rooms())
}
