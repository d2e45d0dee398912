#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # bookings
//!
//! A room availability and booking engine.
//!
//! Guests search for rooms that are free over a date range, pick one, enter
//! their contact details and confirm. The engine guarantees that no two
//! reservations ever hold the same room for overlapping dates.
//!
//! ## Core Types
//!
//! - [`StayRange`]: a validated half-open `[start, end)` date interval
//! - [`Room`], [`Restriction`] and [`Reservation`]: the persisted data model
//! - [`DraftReservation`]: the session-staged booking candidate
//! - [`AvailabilityRepository`] and [`BookingRepository`]: the storage seam,
//!   implemented by [`Database`] and [`InMemoryRepository`]
//! - [`ReservationWorkflow`]: the search → select → details → confirm flow
//! - [`Form`]: posted-field validation
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use bookings::StayRange;
//!
//! let booked = StayRange::parse("2025-01-01", "2025-01-05").unwrap();
//! let next = StayRange::parse("2025-01-05", "2025-01-10").unwrap();
//!
//! // Half-open ranges: checking out on the 5th frees the room for the 5th.
//! assert!(!booked.overlaps(&next));
//! assert_eq!(booked.nights(), 4);
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod forms;
pub mod logging;
pub mod repository;
pub mod reservation;
pub mod restriction;
pub mod room;
pub mod session;
pub mod stay;
pub mod workflow;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig, SqliteSessionStore};
pub use error::{Error, ErrorCategory, Result};
pub use forms::{Form, FormErrors, FormValues};
pub use logging::{init_logger, LogLevel, Logger};
pub use repository::{AvailabilityRepository, BookingRepository, Deadline, InMemoryRepository};
pub use reservation::{DraftReservation, GuestDetails, Reservation, ReservationId};
pub use restriction::{Restriction, RestrictionId, RestrictionKind};
pub use room::{Room, RoomId};
pub use session::{InMemorySessionStore, SessionStore, SessionToken};
pub use stay::StayRange;
pub use workflow::{BookingSummary, ReservationWorkflow, WorkflowSettings, WorkflowState};
