//! CLI structure and command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    BlockCommand, BookRoomCommand, CancelCommand, CheckCommand, ConfirmCommand, DetailsCommand,
    InitCommand, RoomsCommand, SearchCommand, SelectCommand, ShowCommand, StatusCommand,
    SweepSessionsCommand,
};

/// Search room availability and book rooms.
#[derive(Parser)]
#[command(name = "bookings")]
#[command(version, about = "Search room availability and book rooms", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "BOOKINGS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the configured lock wait (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "BOOKINGS_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization
    #[arg(long, global = true)]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create the data directory and database
    Init(InitCommand),

    /// List every room
    Rooms(RoomsCommand),

    /// Check whether one room is free over a stay (JSON)
    Check(CheckCommand),

    /// Find rooms free over a stay
    Search(SearchCommand),

    /// Pick a room from the last search
    Select(SelectCommand),

    /// Pick a room directly, without a prior search
    BookRoom(BookRoomCommand),

    /// Enter the guest's contact details
    Details(DetailsCommand),

    /// Book the staged room
    Confirm(ConfirmCommand),

    /// Abandon the booking
    Cancel(CancelCommand),

    /// Show where the guest is in the booking flow
    Status(StatusCommand),

    /// Hold a room for the owner
    Block(BlockCommand),

    /// Display a reservation
    Show(ShowCommand),

    /// Delete expired session entries
    SweepSessions(SweepSessionsCommand),
}
