//! CLI command implementations.
//!
//! Setup and inventory:
//! - `init`: create the database, optionally seeding rooms from config
//! - `rooms`: list rooms
//! - `check`: single-room availability as JSON
//! - `block`: hold a room for the owner
//! - `show`: display a reservation
//! - `sweep_sessions`: purge expired session entries
//!
//! The guest workflow, one step per invocation:
//! - `search`, `select`, `book_room`, `details`, `confirm`, `cancel`, `status`

pub mod block;
pub mod book_room;
pub mod cancel;
pub mod check;
pub mod confirm;
pub mod details;
pub mod init;
pub mod rooms;
pub mod search;
pub mod select;
pub mod show;
pub mod status;
pub mod sweep_sessions;

pub use block::BlockCommand;
pub use book_room::BookRoomCommand;
pub use cancel::CancelCommand;
pub use check::CheckCommand;
pub use confirm::ConfirmCommand;
pub use details::DetailsCommand;
pub use init::InitCommand;
pub use rooms::RoomsCommand;
pub use search::SearchCommand;
pub use select::SelectCommand;
pub use show::ShowCommand;
pub use status::StatusCommand;
pub use sweep_sessions::SweepSessionsCommand;
