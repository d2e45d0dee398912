//! SQLite storage for rooms, reservations, restrictions and sessions.
//!
//! # Examples
//!
//! ```no_run
//! use bookings::database::{Database, DatabaseConfig};
//! use bookings::{AvailabilityRepository, Deadline, Room, RoomId, StayRange};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/bookings.db")).unwrap();
//! db.seed_rooms(&[Room::new(RoomId::try_from(1).unwrap(), "General's Quarters")])
//!     .unwrap();
//!
//! let stay = StayRange::parse("2050-01-01", "2050-01-03").unwrap();
//! for room in db.search_available_rooms(&stay, Deadline::none()).unwrap() {
//!     println!("{room}");
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
mod sessions;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE, DATA_DIR_ENV,
};
pub use connection::Database;
pub use sessions::SqliteSessionStore;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
