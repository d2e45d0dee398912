//! Library exports for bookings-cli.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
