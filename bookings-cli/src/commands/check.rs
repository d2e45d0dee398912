//! Check command implementation.
//!
//! Answers "is this room free for these dates?" as a JSON object that
//! always carries the request back, even when the request was bad.

use clap::Args;
use serde::Serialize;

use bookings::AvailabilityRepository;

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_room, print_json, GlobalOptions, StayArgs,
};

/// Check whether one room is free over a stay.
#[derive(Args)]
pub struct CheckCommand {
    /// Room to check
    #[arg(long, value_name = "ID")]
    pub room: String,

    #[command(flatten)]
    pub stay: StayArgs,
}

/// The availability answer.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// Whether the room is free.
    pub ok: bool,
    /// Why the answer is `false` when the check itself failed.
    pub message: String,
    /// The requested room.
    pub room_id: String,
    /// The requested first night.
    pub start_date: String,
    /// The requested check-out date.
    pub end_date: String,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut response = AvailabilityResponse {
            ok: false,
            message: String::new(),
            room_id: self.room.clone(),
            start_date: self.stay.start.clone(),
            end_date: self.stay.end.clone(),
        };

        let request = parse_room(&self.room).and_then(|room| Ok((room, self.stay.stay()?)));
        let (room, stay) = match request {
            Ok(parsed) => parsed,
            Err(e) => {
                response.message = "Invalid request".into();
                print_json(&response)?;
                return Err(e);
            }
        };

        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        match db.is_room_available(room, &stay) {
            Ok(free) => {
                response.ok = free;
                print_json(&response)
            }
            Err(e) => {
                response.message = "Error querying database".into();
                print_json(&response)?;
                Err(e.into())
            }
        }
    }
}
